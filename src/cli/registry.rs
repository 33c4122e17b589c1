use std::collections::HashMap;

use crate::cli::core::CommandResult;
use crate::cli::shell_context::ShellContext;

pub type CommandHandler = fn(&mut ShellContext, &[&str]) -> CommandResult;

pub struct CommandEntry {
    pub name: &'static str,
    pub description: &'static str,
    pub usage: &'static str,
    pub handler: CommandHandler,
}

impl CommandEntry {
    pub const fn new(
        name: &'static str,
        description: &'static str,
        usage: &'static str,
        handler: CommandHandler,
    ) -> Self {
        Self {
            name,
            description,
            usage,
            handler,
        }
    }

    /// Commands whose usage line names no arguments can run straight from the menu.
    pub fn takes_no_arguments(&self) -> bool {
        self.usage == self.name
    }
}

#[derive(Default)]
pub struct CommandRegistry {
    commands: HashMap<&'static str, CommandEntry>,
    order: Vec<&'static str>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, entry: CommandEntry) {
        let name = entry.name;
        if self.commands.insert(name, entry).is_none() {
            self.order.push(name);
        }
    }

    pub fn get(&self, name: &str) -> Option<&CommandEntry> {
        self.commands.get(name)
    }

    pub fn list(&self) -> Vec<&CommandEntry> {
        self.order
            .iter()
            .filter_map(|name| self.commands.get(name))
            .collect()
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.order.iter().copied()
    }

    pub fn handler(&self, name: &str) -> Option<CommandHandler> {
        self.commands.get(name).map(|entry| entry.handler)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn noop(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
        Ok(())
    }

    #[test]
    fn registration_keeps_first_order() {
        let mut registry = CommandRegistry::new();
        registry.register(CommandEntry::new("orders", "List orders", "orders", noop));
        registry.register(CommandEntry::new("sell", "Sell", "sell <variety> <weight>", noop));
        registry.register(CommandEntry::new("orders", "List orders again", "orders", noop));
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["orders", "sell"]);
        assert_eq!(registry.get("orders").unwrap().description, "List orders again");
        assert!(registry.get("orders").unwrap().takes_no_arguments());
        assert!(!registry.get("sell").unwrap().takes_no_arguments());
    }
}
