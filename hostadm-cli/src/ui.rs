use colored::Colorize;

pub fn banner() {
    println!("{}", "hostadm - host maintenance console".bold());
}

pub fn main_menu() {
    println!();
    println!("{}", "select an action".bold());
    println!("  1) system health report");
    println!("  2) user management");
    println!("  3) process monitor");
    println!("  4) backup a file or directory");
    println!("  5) scan logs for a keyword");
    println!("  6) configure alert thresholds");
    println!("  0) quit");
}

pub fn user_menu() {
    println!("  1) add user");
    println!("  2) remove user");
    println!("  3) change password");
    println!("  0) back");
}

pub fn ok(message: &str) {
    println!("{} {}", "ok".green().bold(), message);
}

pub fn warn(message: &str) {
    println!("{} {}", "warning:".yellow().bold(), message);
}

pub fn error(message: &str) {
    eprintln!("{} {}", "error:".red().bold(), message);
}
