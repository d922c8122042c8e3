// src/common/operator.rs
//! One-shot operator commands run from the command line instead of serving HTTP
//!
//! ```text
//! api issue-admin-grant [--note <text>] [--expires-in-hours <n>]
//! ```

/// Consumed by `dev_mode::parse_dev_mode_args`
const DEV_MODE_FLAGS: [&str; 5] = ["--dev", "--dev-mode", "--no-dev", "--prod", "--production"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OperatorCommand {
    /// Issue a single-use admin grant and print its secret once
    IssueAdminGrant {
        note: Option<String>,
        expires_in_hours: Option<i64>,
    },
}

/// Parse operator commands from CLI args (program name excluded).
///
/// Returns `Ok(None)` when the args describe a normal server start.
pub fn parse_operator_command<I>(args: I) -> Result<Option<OperatorCommand>, String>
where
    I: IntoIterator<Item = String>,
{
    let mut args = args
        .into_iter()
        .filter(|a| !DEV_MODE_FLAGS.contains(&a.as_str()));

    match args.next().as_deref() {
        Some("issue-admin-grant") => {
            let mut note = None;
            let mut expires_in_hours = None;

            while let Some(flag) = args.next() {
                match flag.as_str() {
                    "--note" => {
                        note = Some(args.next().ok_or("--note requires a value")?);
                    }
                    "--expires-in-hours" => {
                        let raw = args.next().ok_or("--expires-in-hours requires a value")?;
                        let hours = raw
                            .parse::<i64>()
                            .ok()
                            .filter(|h| *h > 0)
                            .ok_or_else(|| format!("invalid hour count: {}", raw))?;
                        expires_in_hours = Some(hours);
                    }
                    other => return Err(format!("unknown option: {}", other)),
                }
            }

            Ok(Some(OperatorCommand::IssueAdminGrant {
                note,
                expires_in_hours,
            }))
        }
        Some(other) if !other.starts_with('-') => Err(format!("unknown command: {}", other)),
        _ => Ok(None),
    }
}
