//! `weft names`: show derived command names.

use serde::Serialize;
use weft_core::domain::NameDeriver;

use crate::{cli::NamesArgs, config::AppConfig, error::CliResult, output::OutputManager};

#[derive(Debug, PartialEq, Eq, Serialize)]
struct DerivedNames {
    name: String,
    command_name: String,
    instance_command_name: String,
}

fn derive(name: &str, suffix: &str) -> DerivedNames {
    let deriver = NameDeriver::new(suffix);
    DerivedNames {
        name: name.to_string(),
        command_name: deriver.derive_command_name(name),
        instance_command_name: deriver.derive_instance_command_name(name),
    }
}

pub fn execute(args: NamesArgs, config: AppConfig, output: OutputManager) -> CliResult<()> {
    let suffix = args.suffix.as_deref().unwrap_or(&config.weave.suffix);
    let names = derive(&args.name, suffix);

    if output.is_json() {
        return output.json(&names);
    }

    output.print(&format!("Command name:  {}", names.command_name))?;
    output.print(&format!("Instance name: {}", names.instance_command_name))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derives_both_names() {
        let names = derive("OrdersViewModel", "ViewModel");
        assert_eq!(names.command_name, "OrdersCommand");
        assert_eq!(names.instance_command_name, "ordersCommand");
    }

    #[test]
    fn custom_suffix() {
        let names = derive("OrdersPage", "Page");
        assert_eq!(names.command_name, "OrdersCommand");
        assert_eq!(derive("OrdersPage", "ViewModel").command_name, "UnknownCommand");
    }
}
