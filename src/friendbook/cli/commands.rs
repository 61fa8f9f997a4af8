use super::print::{
    print_chats, print_info, print_json, print_lines, print_post, print_posts, print_success,
    print_thread, print_users, ChatSummary,
};
use super::setup::{Cli, Commands};
use friendbook::api::Friendbook;
use friendbook::error::{FriendbookError, Result};
use friendbook::init::initialize;
use friendbook::model::Post;
use friendbook::store::fs::FileStore;
use serde_json::json;

struct AppContext {
    api: Friendbook<FileStore>,
    json: bool,
}

pub fn run(cli: Cli) -> Result<()> {
    let mut ctx = AppContext {
        api: initialize(cli.data_dir.as_deref())?,
        json: cli.json,
    };

    if !needs_session(&cli.command) {
        return dispatch(&mut ctx, cli.command);
    }

    let (Some(email), Some(password)) = (cli.email.as_deref(), cli.password.as_deref()) else {
        return Err(FriendbookError::InvalidInput(
            "this command needs --email and --password (or FRIENDBOOK_EMAIL and FRIENDBOOK_PASSWORD)"
                .to_string(),
        ));
    };
    ctx.api.login(email, password)?;

    let result = dispatch(&mut ctx, cli.command);
    let logged_out = ctx.api.logout();
    result.and(logged_out)
}

fn needs_session(command: &Commands) -> bool {
    !matches!(
        command,
        Commands::Register { .. } | Commands::ResetPassword { .. } | Commands::Users { .. }
    )
}

fn dispatch(ctx: &mut AppContext, command: Commands) -> Result<()> {
    match command {
        Commands::Register {
            username,
            email,
            password,
            gender,
        } => {
            ctx.api.register(&username, &email, &password, &gender)?;
            done(ctx, format!("Registered {}", username))
        }
        Commands::ResetPassword {
            email,
            answer,
            new_password,
        } => {
            ctx.api.reset_password(&email, &answer, &new_password)?;
            done(ctx, "Password reset".to_string())
        }
        Commands::ChangePassword { old, new } => {
            ctx.api.change_password(&old, &new)?;
            done(ctx, "Password changed".to_string())
        }
        Commands::Users { query } => handle_users(ctx, query),
        Commands::Feed => {
            let posts = ctx.api.feed()?;
            show_posts(ctx, &posts, "Your feed is empty.")
        }
        Commands::Timeline { username } => {
            let posts = ctx.api.timeline(&username)?;
            show_posts(ctx, &posts, "No posts to show.")
        }
        Commands::Show { id } => {
            let post = ctx.api.view_post(id)?;
            if ctx.json {
                return print_json(post);
            }
            print_post(post);
            Ok(())
        }
        Commands::Post { text, privacy } => {
            let id = match privacy {
                Some(privacy) => ctx.api.create_post_with_privacy(&text, privacy)?,
                None => ctx.api.create_post(&text)?,
            };
            created(ctx, "post", id.0)
        }
        Commands::Like { id } => {
            let changed = ctx.api.like_post(id)?;
            toggled(ctx, changed, format!("Liked post {}", id), "Already liked")
        }
        Commands::Unlike { id } => {
            let changed = ctx.api.unlike_post(id)?;
            toggled(ctx, changed, format!("Unliked post {}", id), "Not liked")
        }
        Commands::Comment { id, text } => {
            let comment = ctx.api.comment_on_post(id, &text)?;
            created(ctx, "comment", comment.0)
        }
        Commands::Reply {
            post,
            comment,
            text,
        } => {
            let reply = ctx.api.reply_to_comment(post, comment, &text)?;
            created(ctx, "reply", reply.0)
        }
        Commands::LikeComment { post, comment } => {
            let changed = ctx.api.like_comment(post, comment)?;
            toggled(ctx, changed, format!("Liked comment {}", comment), "Already liked")
        }
        Commands::Share { id } => {
            let shared = ctx.api.share_post(id)?;
            created(ctx, "post", shared.0)
        }
        Commands::Delete { id } => {
            ctx.api.delete_post(id)?;
            done(ctx, format!("Deleted post {}", id))
        }
        Commands::Tag { id, username } => {
            let changed = ctx.api.tag_user(id, &username)?;
            toggled(ctx, changed, format!("Tagged {}", username), "Already tagged")
        }
        Commands::SetPrivacy { id, privacy } => {
            ctx.api.set_post_privacy(id, privacy)?;
            done(ctx, format!("Post {} is now {}", id, privacy))
        }
        Commands::Search { query } => {
            let posts = ctx.api.search_posts(&query)?;
            show_posts(ctx, &posts, "No posts found.")
        }
        Commands::Friends => {
            let friends = ctx.api.friends()?;
            if ctx.json {
                return print_json(&friends);
            }
            print_users(&friends, "You have no friends yet.");
            Ok(())
        }
        Commands::Requests => {
            let pending = ctx.api.pending_friend_requests()?;
            if ctx.json {
                return print_json(&pending);
            }
            print_lines(&pending, "No pending friend requests.");
            Ok(())
        }
        Commands::AddFriend { username } => {
            ctx.api.send_friend_request(&username)?;
            done(ctx, format!("Friend request sent to {}", username))
        }
        Commands::Accept { username } => {
            ctx.api.accept_friend_request(&username)?;
            done(ctx, format!("You and {} are now friends", username))
        }
        Commands::Reject { username } => {
            ctx.api.reject_friend_request(&username)?;
            done(ctx, format!("Rejected friend request from {}", username))
        }
        Commands::Unfriend { username } => {
            ctx.api.remove_friend(&username)?;
            done(ctx, format!("Removed {} from friends", username))
        }
        Commands::Block { username } => {
            ctx.api.block_user(&username)?;
            done(ctx, format!("Blocked {}", username))
        }
        Commands::Unblock { username } => {
            let changed = ctx.api.unblock_user(&username)?;
            toggled(ctx, changed, format!("Unblocked {}", username), "Not blocked")
        }
        Commands::Restrict { username } => {
            ctx.api.restrict_friend(&username)?;
            done(ctx, format!("Restricted {}", username))
        }
        Commands::Unrestrict { username } => {
            let changed = ctx.api.unrestrict_friend(&username)?;
            toggled(ctx, changed, format!("Unrestricted {}", username), "Not restricted")
        }
        Commands::Mutual { username } => {
            let mutual = ctx.api.mutual_friends(&username)?;
            if ctx.json {
                return print_json(&mutual);
            }
            print_users(&mutual, "No mutual friends.");
            Ok(())
        }
        Commands::Common { username } => {
            let posts = ctx.api.common_posts(&username)?;
            show_posts(ctx, &posts, "No posts in common.")
        }
        Commands::Message { username, text } => {
            ctx.api.send_message(&username, &text)?;
            done(ctx, format!("Message sent to {}", username))
        }
        Commands::Messages { username } => {
            let thread = ctx.api.messages_with(&username)?;
            if ctx.json {
                return print_json(&thread);
            }
            print_thread(thread);
            Ok(())
        }
        Commands::Chats => {
            let chats: Vec<ChatSummary> = ctx
                .api
                .conversations()?
                .into_iter()
                .map(|(with, last)| ChatSummary { with, last })
                .collect();
            if ctx.json {
                return print_json(&chats);
            }
            print_chats(&chats);
            Ok(())
        }
        Commands::Notifications => {
            let notifications = ctx.api.notifications()?;
            if ctx.json {
                return print_json(&notifications);
            }
            print_lines(&notifications, "No notifications.");
            Ok(())
        }
    }
}

fn handle_users(ctx: &mut AppContext, query: Option<String>) -> Result<()> {
    let users = match query.as_deref() {
        Some(q) => ctx.api.search_users(q),
        None => ctx.api.users().iter().collect(),
    };
    if ctx.json {
        return print_json(&users);
    }
    print_users(&users, "No users found.");
    Ok(())
}

fn show_posts(ctx: &AppContext, posts: &[&Post], empty: &str) -> Result<()> {
    if ctx.json {
        return print_json(&posts);
    }
    print_posts(posts, empty);
    Ok(())
}

fn done(ctx: &AppContext, message: String) -> Result<()> {
    if ctx.json {
        return print_json(&json!({ "ok": true, "message": message }));
    }
    print_success(&message);
    Ok(())
}

fn created(ctx: &AppContext, what: &str, id: u64) -> Result<()> {
    if ctx.json {
        return print_json(&json!({ "ok": true, "kind": what, "id": id }));
    }
    print_success(&format!("Created {} {}", what, id));
    Ok(())
}

/// Reports a set-like change; `unchanged` is shown when there was nothing to do.
fn toggled(ctx: &AppContext, changed: bool, message: String, unchanged: &str) -> Result<()> {
    if ctx.json {
        return print_json(&json!({ "ok": true, "changed": changed }));
    }
    if changed {
        print_success(&message);
    } else {
        print_info(unchanged);
    }
    Ok(())
}
