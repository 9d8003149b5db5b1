use std::io::{BufRead, Write};

use crate::error::AppError;

/// Gate for operations that erase history.
///
/// Passes when `assume_yes` is set, or when `interactive` and the answer
/// read from `input` starts with `y`.
pub(crate) fn confirm(
    prompt: &str,
    assume_yes: bool,
    interactive: bool,
    input: &mut dyn BufRead,
    output: &mut dyn Write,
) -> Result<(), AppError> {
    if assume_yes {
        return Ok(());
    }
    if !interactive {
        return Err(AppError::Declined(format!(
            "{prompt} Refusing without a terminal; pass --yes to confirm"
        )));
    }

    write!(output, "{prompt} [y/N] ")
        .and_then(|()| output.flush())
        .map_err(|e| AppError::Declined(format!("Could not show confirmation prompt: {e}")))?;

    let mut answer = String::new();
    input
        .read_line(&mut answer)
        .map_err(|e| AppError::Declined(format!("Could not read confirmation: {e}")))?;

    if answer.trim().to_ascii_lowercase().starts_with('y') {
        Ok(())
    } else {
        Err(AppError::Declined("Aborted, history left untouched".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ask(answer: &str, assume_yes: bool, interactive: bool) -> Result<(), AppError> {
        let mut input = answer.as_bytes();
        let mut output = Vec::new();
        confirm("Clear history", assume_yes, interactive, &mut input, &mut output)
    }

    #[test]
    fn yes_flag_skips_prompt() {
        assert!(ask("", true, false).is_ok());
    }

    #[test]
    fn non_interactive_without_yes_is_refused() {
        let err = ask("y\n", false, false).unwrap_err();
        assert!(err.to_string().contains("--yes"));
    }

    #[test]
    fn answers_are_case_insensitive() {
        assert!(ask("y\n", false, true).is_ok());
        assert!(ask("YES\n", false, true).is_ok());
        assert!(ask("n\n", false, true).is_err());
        assert!(ask("\n", false, true).is_err());
    }

    struct ClosedOutput;

    impl Write for ClosedOutput {
        fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::from(std::io::ErrorKind::BrokenPipe))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn unwritable_prompt_is_refused_before_reading() {
        let mut input = "y\n".as_bytes();
        let err = confirm("Clear history", false, true, &mut input, &mut ClosedOutput).unwrap_err();
        assert!(matches!(err, AppError::Declined(_)));
        assert!(err.to_string().contains("confirmation prompt"), "{err}");
        // The answer was never consumed
        assert_eq!(input, b"y\n");
    }
}
