use clap::{Parser, Subcommand};
use friendbook::ids::{CommentId, PostId};
use friendbook::model::Privacy;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "friendbook")]
#[command(about = "A small, file-backed social network", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Data directory (defaults to $FRIENDBOOK_HOME, then the platform data dir)
    #[arg(long, global = true, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Email to log in with
    #[arg(long, global = true, env = "FRIENDBOOK_EMAIL")]
    pub email: Option<String>,

    /// Password to log in with
    #[arg(long, global = true, env = "FRIENDBOOK_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create an account
    Register {
        username: String,
        email: String,
        password: String,

        #[arg(long, default_value = "")]
        gender: String,
    },

    /// Set a new password for the account behind an email
    ResetPassword {
        email: String,
        /// Answer to the security question
        answer: String,
        new_password: String,
    },

    /// Change the password of the logged-in account
    ChangePassword { old: String, new: String },

    /// List users, optionally filtered by username or email
    Users { query: Option<String> },

    /// Your posts and your friends' posts, newest first
    Feed,

    /// Posts of one user that you may see
    Timeline { username: String },

    /// Show a post with its comments
    Show { id: PostId },

    /// Publish a post
    Post {
        text: String,

        /// public, friends or private (defaults to the configured privacy)
        #[arg(long)]
        privacy: Option<Privacy>,
    },

    Like { id: PostId },

    Unlike { id: PostId },

    /// Comment on a post
    Comment { id: PostId, text: String },

    /// Reply to a comment
    Reply {
        post: PostId,
        comment: CommentId,
        text: String,
    },

    /// Like a comment
    LikeComment { post: PostId, comment: CommentId },

    /// Repost someone's post as your own
    Share { id: PostId },

    /// Delete one of your posts
    #[command(alias = "rm")]
    Delete { id: PostId },

    /// Tag a user in one of your posts
    Tag { id: PostId, username: String },

    /// Change who can see one of your posts
    SetPrivacy { id: PostId, privacy: Privacy },

    /// Search posts you may see by content or author
    Search { query: String },

    /// List your friends
    Friends,

    /// List pending friend requests
    Requests,

    AddFriend { username: String },

    Accept { username: String },

    Reject { username: String },

    Unfriend { username: String },

    Block { username: String },

    Unblock { username: String },

    /// Hide your friends-only posts from a friend
    Restrict { username: String },

    Unrestrict { username: String },

    /// Friends you have in common with a user
    Mutual { username: String },

    /// Posts you and a friend can both see
    Common { username: String },

    /// Send a direct message
    Message { username: String, text: String },

    /// Show the conversation with a user
    Messages { username: String },

    /// List your conversations
    Chats,

    /// Show your notifications
    Notifications,
}
