//! Dry-run mode utilities

use colored::Colorize;

/// Whether mutating steps should be performed or only printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DryRun(bool);

impl DryRun {
    pub fn enabled() -> Self {
        Self(true)
    }

    pub fn disabled() -> Self {
        Self(false)
    }

    pub fn is_enabled(&self) -> bool {
        self.0
    }

    /// Log a single dry-run action
    pub fn log_action(&self, action: &str) {
        if self.0 {
            println!("  {} {}", "[DRY RUN]".cyan().bold(), action);
        }
    }

    /// Log multiple dry-run actions as a numbered list
    pub fn log_actions(&self, actions: &[String]) {
        if !self.0 {
            return;
        }

        println!(
            "{}",
            "[DRY RUN] Would perform the following actions:"
                .cyan()
                .bold()
        );
        println!();

        for (i, action) in actions.iter().enumerate() {
            println!("  {}. {}", i + 1, action);
        }

        println!();
        println!("{}", "No changes were made (--dry-run mode)".yellow());
    }

    /// Execute `f` only if not in dry-run mode
    pub fn exec_unless<F, E>(&self, action_desc: &str, f: F) -> Result<(), E>
    where
        F: FnOnce() -> Result<(), E>,
    {
        if self.0 {
            self.log_action(action_desc);
            Ok(())
        } else {
            f()
        }
    }
}

impl From<bool> for DryRun {
    fn from(enabled: bool) -> Self {
        Self(enabled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_disabled() {
        assert!(!DryRun::default().is_enabled());
        assert!(DryRun::from(true).is_enabled());
    }

    #[test]
    fn test_exec_unless_runs_when_disabled() {
        let mut executed = false;
        let result: Result<(), ()> = DryRun::disabled().exec_unless("test action", || {
            executed = true;
            Ok(())
        });

        assert!(result.is_ok());
        assert!(executed);
    }

    #[test]
    fn test_exec_unless_skips_when_enabled() {
        let mut executed = false;
        let result: Result<(), ()> = DryRun::enabled().exec_unless("test action", || {
            executed = true;
            Ok(())
        });

        assert!(result.is_ok());
        assert!(!executed);
    }
}
