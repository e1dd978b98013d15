//! Patterns command: list the registered generators.

use dotgrid::PatternRegistry;

/// One line per pattern: name, aliases, description.
pub fn patterns_listing(registry: &PatternRegistry) -> String {
    let mut out = String::from("Available patterns:\n");
    for name in registry.names() {
        let description = registry.get(name).map(|e| e.description).unwrap_or_default();
        let aliases = registry.aliases_of(name);
        if aliases.is_empty() {
            out.push_str(&format!("  {:<12} {}\n", name, description));
        } else {
            out.push_str(&format!(
                "  {:<12} {} (aliases: {})\n",
                name,
                description,
                aliases.join(", ")
            ));
        }
    }
    out
}

/// Execute the patterns command.
pub fn cmd_patterns(registry: &PatternRegistry) {
    print!("{}", patterns_listing(registry));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_builtin_with_alias() {
        let listing = patterns_listing(&PatternRegistry::builtin());
        let lines: Vec<&str> = listing.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[1].trim_start().starts_with("points"));
        assert!(lines[1].contains("(aliases: dots)"));
    }
}
