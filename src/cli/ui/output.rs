use console::style;

const BANNER_WIDTH: usize = 60;

/// Console messages for command handlers
pub struct Output;

impl Output {
    pub fn new() -> Self {
        Self
    }

    pub fn success(&self, message: &str) {
        println!("{} {}", style("✓").green(), message);
    }

    pub fn error(&self, message: &str) {
        eprintln!("{} {}", style("✗").red(), message);
    }

    pub fn warning(&self, message: &str) {
        println!("{} {}", style("⚠").yellow(), message);
    }

    pub fn info(&self, message: &str) {
        println!("{} {}", style("ℹ").blue(), message);
    }

    /// Boxed title between two heavy rules
    pub fn banner(&self, title: &str) {
        let rule = "=".repeat(BANNER_WIDTH);
        println!("\n{}", rule);
        println!("   {}", style(title).bold());
        println!("{}", rule);
    }

    pub fn section(&self, message: &str) {
        println!("\n{}", style(message).bold());
        println!("{}", "─".repeat(40));
    }

    /// Aligned `label: value` line
    pub fn field(&self, label: &str, value: impl std::fmt::Display) {
        println!("   {:<17}{}", format!("{}:", label), value);
    }

    /// Multi-line text, indented to sit under a banner
    pub fn block(&self, text: &str) {
        for line in text.lines() {
            println!("   {}", line);
        }
    }
}

impl Default for Output {
    fn default() -> Self {
        Self::new()
    }
}
