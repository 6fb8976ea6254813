//! Chat header.

use console::style;

/// Print the chat header: assistant name and online status.
pub fn print_chat_header(assistant_name: &str, ephemeral: bool) {
    println!();
    println!(
        "  {}  {} {}",
        style(assistant_name).magenta().bold(),
        style("●").green(),
        style("Online").green()
    );
    if ephemeral {
        println!(
            "  {}",
            style("Ephemeral chat: nothing in this conversation is stored").yellow()
        );
    }
    println!();
    println!(
        "  {}",
        style("Type /help for commands, Ctrl+D to exit").dim()
    );
    println!("  {}", style("---").dim());
    println!();
}
