use std::io::{self, Write};

/// Ask the user to confirm a destructive action. Defaults to no.
pub fn confirm(prompt: &str) -> bool {
    print!("{} [y/N]: ", prompt);
    if io::stdout().flush().is_err() {
        return false;
    }

    let mut input = String::new();
    match io::stdin().read_line(&mut input) {
        Ok(_) => matches!(input.trim().to_lowercase().as_str(), "y" | "yes"),
        Err(_) => false,
    }
}

/// First 8 characters of an id, for display
pub fn short_id(id: &str) -> &str {
    id.get(..8).unwrap_or(id)
}
