//! Administrative command surface
//!
//! Executes operator command lines such as `add_ace group.admin command allow`
//! against a [`Context`]. Each command `X` is itself gated by the object
//! `command.X`, checked against the calling thread's principal scope.

use crate::context::Context;
use crate::error::{Result, SecurityError};
use crate::scope;
use crate::types::{AccessType, Principal};

use std::path::Path;
use tracing::{debug, warn};

/// Parsed administrative command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `add_ace <principal> <object> <allow|deny>`
    AddAce {
        principal: String,
        object: String,
        access: AccessType,
    },
    /// `remove_ace <principal> <object> <allow|deny>`
    RemoveAce {
        principal: String,
        object: String,
        access: AccessType,
    },
    /// `add_principal <child> <parent>`
    AddPrincipal { child: String, parent: String },
    /// `remove_principal <child> <parent>`
    RemovePrincipal { child: String, parent: String },
    /// `test_ace <principal> <object>`
    TestAce { principal: String, object: String },
    /// `list_principals`
    ListPrincipals,
    /// `list_aces`
    ListAces,
}

impl Command {
    /// Every command name the console understands
    pub const NAMES: [&'static str; 7] = [
        "add_ace",
        "remove_ace",
        "add_principal",
        "remove_principal",
        "test_ace",
        "list_principals",
        "list_aces",
    ];

    /// Parse a command name and its arguments
    ///
    /// Arity is checked before the access token so a short command reports
    /// the count mismatch.
    pub fn parse(name: &str, args: &[String]) -> Result<Self> {
        let name = name.to_ascii_lowercase();
        let wanted = match name.as_str() {
            "add_ace" | "remove_ace" => 3,
            "add_principal" | "remove_principal" | "test_ace" => 2,
            "list_principals" | "list_aces" => 0,
            _ => return Err(SecurityError::UnknownCommand(name.clone())),
        };

        if args.len() != wanted {
            return Err(SecurityError::ArgumentCount {
                command: name,
                passed: args.len(),
                wanted,
            });
        }

        let arg = |i: usize| args[i].clone();

        Ok(match name.as_str() {
            "add_ace" => Self::AddAce {
                principal: arg(0),
                object: arg(1),
                access: args[2].parse()?,
            },
            "remove_ace" => Self::RemoveAce {
                principal: arg(0),
                object: arg(1),
                access: args[2].parse()?,
            },
            "add_principal" => Self::AddPrincipal {
                child: arg(0),
                parent: arg(1),
            },
            "remove_principal" => Self::RemovePrincipal {
                child: arg(0),
                parent: arg(1),
            },
            "test_ace" => Self::TestAce {
                principal: arg(0),
                object: arg(1),
            },
            "list_principals" => Self::ListPrincipals,
            _ => Self::ListAces,
        })
    }

    /// Principal whose own rules this command would modify
    fn modified_principal(&self) -> Option<&str> {
        match self {
            Self::AddAce { principal, .. } | Self::RemoveAce { principal, .. } => Some(principal.as_str()),
            Self::AddPrincipal { child, .. } | Self::RemovePrincipal { child, .. } => Some(child.as_str()),
            _ => None,
        }
    }
}

/// Split a command line into tokens
///
/// Tokens are separated by whitespace; double quotes group a token that
/// contains spaces.
pub fn tokenize(line: &str) -> Result<Vec<String>> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_token = false;
    let mut quoted = false;

    for c in line.chars() {
        match c {
            '"' => {
                quoted = !quoted;
                in_token = true;
            }
            c if c.is_whitespace() && !quoted => {
                if in_token {
                    tokens.push(std::mem::take(&mut current));
                    in_token = false;
                }
            }
            c => {
                current.push(c);
                in_token = true;
            }
        }
    }

    if quoted {
        return Err(SecurityError::MalformedCommand(format!(
            "unterminated quote in '{}'",
            line
        )));
    }

    if in_token {
        tokens.push(current);
    }

    Ok(tokens)
}

/// Command executor bound to one context
#[derive(Debug, Clone)]
pub struct Console {
    context: Context,
}

impl Console {
    /// Create a console operating on `context`
    pub fn new(context: Context) -> Self {
        Self { context }
    }

    /// The context commands operate on
    pub fn context(&self) -> &Context {
        &self.context
    }

    /// Execute one command line, returning its output lines
    ///
    /// Blank lines produce no output. Rejected commands leave the context
    /// untouched.
    pub fn execute(&self, line: &str) -> Result<Vec<String>> {
        let tokens = tokenize(line)?;
        let Some((name, args)) = tokens.split_first() else {
            return Ok(Vec::new());
        };

        let result = self.dispatch(name, args);
        if let Err(e) = &result {
            warn!(command = %name, error = %e, "command rejected");
        }
        result
    }

    fn dispatch(&self, name: &str, args: &[String]) -> Result<Vec<String>> {
        let lowered = name.to_ascii_lowercase();
        if !Command::NAMES.iter().any(|known| *known == lowered) {
            return Err(SecurityError::UnknownCommand(name.to_string()));
        }

        if !self.context.check_privilege(format!("command.{}", lowered)) {
            return Err(SecurityError::AccessDenied(name.to_string()));
        }

        let command = Command::parse(&lowered, args)?;
        self.run(command)
    }

    /// Run an already parsed command, skipping the `command.X` gate
    pub fn run(&self, command: Command) -> Result<Vec<String>> {
        if let Some(target) = command.modified_principal() {
            let target = Principal::new(target);
            if scope::principals_in_scope().contains(&target) {
                return Err(SecurityError::SelfModification(target.to_string()));
            }
        }

        debug!(?command, "running command");

        let output = match command {
            Command::AddAce {
                principal,
                object,
                access,
            } => {
                self.context.add_access_control_entry(principal, object, access);
                Vec::new()
            }
            Command::RemoveAce {
                principal,
                object,
                access,
            } => {
                self.context.remove_access_control_entry(principal, object, access);
                Vec::new()
            }
            Command::AddPrincipal { child, parent } => {
                self.context.add_principal_inheritance(child, parent);
                Vec::new()
            }
            Command::RemovePrincipal { child, parent } => {
                self.context.remove_principal_inheritance(child, parent);
                Vec::new()
            }
            Command::TestAce { principal, object } => {
                let allowed = self.context.check_principal_privilege(principal.as_str(), object.as_str());
                vec![format!(
                    "{} -> {} is {}",
                    principal,
                    object,
                    if allowed { "allowed" } else { "not allowed" }
                )]
            }
            Command::ListPrincipals => {
                let mut lines = Vec::new();
                self.context
                    .for_all_principal_inheritances(|edge| lines.push(edge.to_string()));
                lines
            }
            Command::ListAces => {
                let mut lines = Vec::new();
                self.context
                    .for_all_access_control_entries(|ace| lines.push(ace.to_string()));
                lines
            }
        };

        Ok(output)
    }

    /// Execute a script of command lines
    ///
    /// Lines that are blank or start with `#` or `//` are skipped. A failing
    /// line does not stop the script; its error message becomes an output
    /// line instead.
    pub fn exec(&self, script: &str) -> Vec<String> {
        let mut output = Vec::new();

        for line in script.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with("//") {
                continue;
            }

            match self.execute(line) {
                Ok(lines) => output.extend(lines),
                Err(e) => output.push(e.to_string()),
            }
        }

        output
    }

    /// Read and execute a script file
    pub fn exec_file(&self, path: impl AsRef<Path>) -> Result<Vec<String>> {
        let script = std::fs::read_to_string(path.as_ref())?;
        debug!(path = %path.as_ref().display(), "executing script");
        Ok(self.exec(&script))
    }
}
