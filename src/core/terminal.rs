use console::{Emoji, style};

pub static SUCCESS_ICON: Emoji<'_, '_> = Emoji("✅ ", "");
pub static INFO_ICON: Emoji<'_, '_> = Emoji("ℹ️  ", "");
pub static WARN_ICON: Emoji<'_, '_> = Emoji("⚠️  ", "");
pub static ERROR_ICON: Emoji<'_, '_> = Emoji("❌ ", "");
pub static ROCKET: Emoji<'_, '_> = Emoji("🚀 ", "");
pub static GLOBE: Emoji<'_, '_> = Emoji("🌐 ", "");
pub static GEAR: Emoji<'_, '_> = Emoji("⚙️  ", "");
pub static SPARKLE: Emoji<'_, '_> = Emoji("✨ ", "");
pub static TICKET: Emoji<'_, '_> = Emoji("🎫 ", "");

pub fn print_success(msg: &str) {
    println!("{} {}", SUCCESS_ICON, style(msg).green());
}

pub fn print_info(msg: &str) {
    println!("{} {}", INFO_ICON, style(msg).blue());
}

pub fn print_warn(msg: &str) {
    println!("{} {}", WARN_ICON, style(msg).yellow());
}

pub fn print_error(msg: &str) {
    eprintln!("{} {}", ERROR_ICON, style(msg).red().bold());
}

pub fn print_status(label: &str, msg: &str) {
    println!("  {} {}: {}", GEAR, style(label).bold().cyan(), msg);
}

pub fn print_step(step: &str) {
    println!("{} {}", SPARKLE, style(step).bold());
}

pub fn print_link(label: &str, url: &str) {
    println!(
        "  {} {}: {}",
        GLOBE,
        style(label).bold(),
        style(url).underlined().cyan()
    );
}

pub fn print_banner() {
    println!();
    println!("{}{}", ROCKET, style("supportflow").bold().cyan());
    println!(
        "{}\n",
        style("classify → ticket → sentiment → respond").dim()
    );
}

enum GuideLine {
    Command(String, String),
    Status(String, String),
    Text(String),
    Hint(String, String),
    Blank,
}

/// A titled block of help output, built line by line and printed at once.
pub struct GuideSection {
    title: String,
    lines: Vec<GuideLine>,
}

impl GuideSection {
    pub fn new(title: &str) -> Self {
        Self {
            title: title.to_string(),
            lines: Vec::new(),
        }
    }

    pub fn command(mut self, name: &str, description: &str) -> Self {
        self.lines
            .push(GuideLine::Command(name.to_string(), description.to_string()));
        self
    }

    pub fn status(mut self, label: &str, value: &str) -> Self {
        self.lines
            .push(GuideLine::Status(label.to_string(), value.to_string()));
        self
    }

    pub fn text(mut self, text: &str) -> Self {
        self.lines.push(GuideLine::Text(text.to_string()));
        self
    }

    pub fn hint(mut self, example: &str, note: &str) -> Self {
        self.lines
            .push(GuideLine::Hint(example.to_string(), note.to_string()));
        self
    }

    pub fn blank(mut self) -> Self {
        self.lines.push(GuideLine::Blank);
        self
    }

    pub fn print(&self) {
        println!("\n {}", style(&self.title).bold().underlined());
        let width = self
            .lines
            .iter()
            .filter_map(|l| match l {
                GuideLine::Command(name, _) => Some(name.chars().count()),
                _ => None,
            })
            .max()
            .unwrap_or(0);

        for line in &self.lines {
            match line {
                GuideLine::Command(name, desc) => {
                    println!("   {}  {}", style(format!("{:<width$}", name)).green(), desc)
                }
                GuideLine::Status(label, value) => {
                    println!("   {}: {}", style(label).bold().cyan(), value)
                }
                GuideLine::Text(text) => println!("   {}", text),
                GuideLine::Hint(example, note) if note.is_empty() => {
                    println!("   {} {}", style("$").dim(), style(example).yellow())
                }
                GuideLine::Hint(example, note) => println!(
                    "   {} {}  {}",
                    style("$").dim(),
                    style(example).yellow(),
                    style(note).dim()
                ),
                GuideLine::Blank => println!(),
            }
        }
    }
}

pub fn print_ticket_line(ticket_id: i64, status: &str, customer: &str, issue: &str) {
    println!(
        "  {}{} {:<12} {:<16} {}",
        TICKET,
        style(format!("#{}", ticket_id)).bold(),
        style(status).cyan(),
        customer,
        style(issue).dim()
    );
}
