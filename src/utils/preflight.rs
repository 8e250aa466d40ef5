//! Preflight validation checks before installing add-ons

use crate::utils::MasterPaths;
use crate::utils::prereqs::{CommonPrereqs, Prerequisite};
use colored::Colorize;

/// Result of a preflight check
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckResult {
    Pass(String),
    Warn(String),
    Fail(String),
}

impl CheckResult {
    pub fn is_error(&self) -> bool {
        matches!(self, CheckResult::Fail(_))
    }

    pub fn is_warning(&self) -> bool {
        matches!(self, CheckResult::Warn(_))
    }

    pub fn display(&self) {
        match self {
            CheckResult::Pass(msg) => println!("  {} {}", "✓".green(), msg),
            CheckResult::Warn(msg) => println!("  {} {}", "⚠".yellow(), msg),
            CheckResult::Fail(msg) => println!("  {} {}", "✗".red(), msg),
        }
    }
}

/// Collects preflight results for an install run
#[derive(Debug, Default)]
pub struct PreflightChecker {
    checks: Vec<CheckResult>,
}

impl PreflightChecker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn results(&self) -> &[CheckResult] {
        &self.checks
    }

    /// The admin commands are run through `oc`
    pub fn check_oc(&mut self, binary: &str) -> &mut Self {
        let oc = CommonPrereqs::oc(binary);
        let result = match oc.check() {
            Ok(()) => CheckResult::Pass(format!("{} found", binary)),
            Err(e) => CheckResult::Fail(format!("{} ({})", e, oc.install_hint())),
        };
        self.checks.push(result);
        self
    }

    /// Signer material and admin credentials the router install reads
    pub fn check_master_dir(&mut self, master: &MasterPaths) -> &mut Self {
        if !master.dir().is_dir() {
            self.checks.push(CheckResult::Fail(format!(
                "Master configuration directory not found: {}",
                master.dir().display()
            )));
            return self;
        }

        for file in master.signer_files() {
            if file.is_file() {
                self.checks
                    .push(CheckResult::Pass(format!("{} present", file.display())));
            } else {
                self.checks
                    .push(CheckResult::Fail(format!("{} missing", file.display())));
            }
        }

        let admin = master.admin_kubeconfig();
        if !admin.is_file() {
            self.checks.push(CheckResult::Warn(format!(
                "{} missing, the router will not be able to watch routes",
                admin.display()
            )));
        }

        if master.router_bundle().exists() {
            self.checks.push(CheckResult::Warn(format!(
                "{} exists and will be overwritten",
                master.router_bundle().display()
            )));
        }

        self
    }

    /// Display results and return whether installation should continue
    pub fn display_results(&self) -> bool {
        println!();

        let errors = self.checks.iter().filter(|c| c.is_error()).count();
        let warnings = self.checks.iter().filter(|c| c.is_warning()).count();

        for check in &self.checks {
            check.display();
        }

        println!();

        if errors > 0 {
            println!("{} error(s), {} warning(s)", errors, warnings);
            false
        } else if warnings > 0 {
            println!("{} warning(s)", warnings);
            true
        } else {
            println!("{}", "All checks passed!".green());
            true
        }
    }
}
