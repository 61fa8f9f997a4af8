use chrono::{DateTime, Utc};
use colored::Colorize;
use friendbook::error::Result;
use friendbook::model::{Comment, Message, Post, Privacy, User};
use serde::Serialize;
use timeago::Formatter;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const LINE_WIDTH: usize = 100;
const TIME_WIDTH: usize = 14;
const INDENT: &str = "    ";

/// One row of `chats`: the other participant and the latest message.
#[derive(Serialize)]
pub(super) struct ChatSummary<'a> {
    pub with: String,
    pub last: &'a Message,
}

pub(super) fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub(super) fn print_success(message: &str) {
    println!("{}", message.green());
}

pub(super) fn print_info(message: &str) {
    println!("{}", message.dimmed());
}

pub(super) fn print_lines(lines: &[String], empty: &str) {
    if lines.is_empty() {
        print_info(empty);
        return;
    }
    for line in lines {
        println!("{}{}", INDENT, line);
    }
}

pub(super) fn print_users(users: &[&User], empty: &str) {
    if users.is_empty() {
        print_info(empty);
        return;
    }
    for user in users {
        let marker = if user.is_bot() { " bot".yellow() } else { "".normal() };
        println!(
            "{}{} {}{}",
            INDENT,
            user.username().bold(),
            format!("<{}>", user.email()).dimmed(),
            marker
        );
    }
}

fn privacy_label(privacy: Privacy) -> colored::ColoredString {
    let label = privacy.to_string();
    match privacy {
        Privacy::Public => label.normal(),
        Privacy::FriendsOnly => label.cyan(),
        Privacy::Private => label.red(),
    }
}

/// One line per post: id, author, a preview of the content, counters and age.
pub(super) fn print_posts(posts: &[&Post], empty: &str) {
    if posts.is_empty() {
        print_info(empty);
        return;
    }

    for post in posts {
        let idx_str = format!("{}. ", post.id());
        let author = format!("{}: ", post.author());
        let counters = format!(
            " ♥{} ✎{} {} ",
            post.likes().len(),
            post.comment_count(),
            post.privacy()
        );

        let preview: String = post
            .content()
            .chars()
            .map(|c| if c == '\n' { ' ' } else { c })
            .collect();

        let fixed_width =
            INDENT.len() + idx_str.width() + author.width() + counters.width() + TIME_WIDTH;
        let available = LINE_WIDTH.saturating_sub(fixed_width);
        let content_display = truncate_to_width(&preview, available);
        let padding = available.saturating_sub(content_display.width());

        println!(
            "{}{}{}{}{}{}{}",
            INDENT,
            idx_str.yellow(),
            author.bold(),
            content_display,
            " ".repeat(padding),
            counters.dimmed(),
            format_time_ago(post.created_at()).dimmed()
        );
    }
}

/// A post in full, followed by its comment thread.
pub(super) fn print_post(post: &Post) {
    println!(
        "{} {} {}",
        format!("#{}", post.id()).yellow(),
        post.author().bold(),
        privacy_label(post.privacy())
    );
    println!("{}", format_time_ago(post.created_at()).trim_start().dimmed());
    println!("--------------------------------");
    println!("{}", post.content());
    println!("--------------------------------");

    if !post.likes().is_empty() {
        println!("{} {}", "Liked by".dimmed(), post.likes().join(", "));
    }
    if !post.tagged_users().is_empty() {
        println!("{} {}", "With".dimmed(), post.tagged_users().join(", "));
    }
    for comment in post.comments() {
        print_comment(comment, 1);
    }
}

fn print_comment(comment: &Comment, depth: usize) {
    let indent = INDENT.repeat(depth);
    let likes = if comment.likes().is_empty() {
        String::new()
    } else {
        format!(" ♥{}", comment.likes().len())
    };
    println!(
        "{}{} {}: {}{}",
        indent,
        format!("[{}]", comment.id()).yellow(),
        comment.author().bold(),
        comment.content(),
        likes.dimmed()
    );
    for reply in comment.replies() {
        print_comment(reply, depth + 1);
    }
}

pub(super) fn print_thread(messages: &[Message]) {
    if messages.is_empty() {
        print_info("No messages yet.");
        return;
    }
    for message in messages {
        println!(
            "{} {}: {}",
            format_time_ago(message.sent_at).dimmed(),
            message.sender.bold(),
            message.content
        );
    }
}

pub(super) fn print_chats(chats: &[ChatSummary]) {
    if chats.is_empty() {
        print_info("No conversations yet.");
        return;
    }
    for chat in chats {
        let preview = format!("{}: {}", chat.last.sender, chat.last.content);
        println!(
            "{}{} {} {}",
            INDENT,
            chat.with.bold(),
            truncate_to_width(&preview, LINE_WIDTH / 2),
            format_time_ago(chat.last.sent_at).dimmed()
        );
    }
}

fn truncate_to_width(s: &str, max_width: usize) -> String {
    let mut result = String::new();
    let mut current_width = 0;

    for c in s.chars() {
        let char_width = c.width().unwrap_or(0);
        if current_width + char_width > max_width.saturating_sub(1) {
            result.push('…');
            return result;
        }
        result.push(c);
        current_width += char_width;
    }

    result
}

fn format_time_ago(timestamp: DateTime<Utc>) -> String {
    let duration = Utc::now().signed_duration_since(timestamp);
    let time_str = Formatter::new().convert(duration.to_std().unwrap_or_default());
    format!("{:>width$}", time_str, width = TIME_WIDTH)
}
