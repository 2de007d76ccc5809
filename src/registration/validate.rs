//! Command name and alias validation.

use crate::error::RegistrationError;

const FORBIDDEN: &[char] = &[',', '.', '<', '>', '[', ']', '{', '}'];

/// A valid name is non-empty and free of whitespace, commas, periods and
/// angle/square/curly brackets.
pub fn is_valid_command_name(name: &str) -> bool {
    !name.is_empty()
        && !name
            .chars()
            .any(|c| c.is_whitespace() || FORBIDDEN.contains(&c))
}

pub fn check_command_name(name: &str) -> Result<(), RegistrationError> {
    if is_valid_command_name(name) {
        Ok(())
    } else {
        Err(RegistrationError::InvalidName {
            name: name.to_string(),
        })
    }
}

/// Split an alias list written as one string (`"d, e ,f"`).
///
/// Without a comma the whole string is a single alias, untrimmed. With
/// commas, spaces around each comma are dropped, as are trailing empty
/// entries; anything else is left for [`check_command_name`] to reject.
pub fn split_aliases(list: &str) -> Vec<String> {
    if !list.contains(',') {
        return vec![list.to_string()];
    }
    let mut aliases: Vec<String> = list
        .split(',')
        .map(|alias| alias.trim_matches(' ').to_string())
        .collect();
    while aliases.last().is_some_and(|alias| alias.is_empty()) {
        aliases.pop();
    }
    aliases
}
