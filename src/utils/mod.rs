pub(crate) mod logging;
pub(crate) mod timezone;

pub(crate) use timezone::Timezone;
