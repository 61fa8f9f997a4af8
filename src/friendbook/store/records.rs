//! Line formats for the post, comment, friendship and message tables.
//!
//! Parsers return a plain reason string on failure; the store decides whether to
//! skip the line or bail.

use crate::codec::{
    decode_timestamp, encode_timestamp, join_list, join_record, split_list, split_record,
};
use crate::ids::{CommentId, PostId};
use crate::model::{Comment, Friendship, Message, Post, Privacy};
use chrono::{DateTime, Utc};

type ParseResult<T> = std::result::Result<T, String>;

fn expect_fields(fields: &[String], min: usize) -> ParseResult<()> {
    if fields.len() < min {
        return Err(format!(
            "expected at least {} fields, found {}",
            min,
            fields.len()
        ));
    }
    Ok(())
}

fn timestamp(field: &str) -> ParseResult<DateTime<Utc>> {
    decode_timestamp(field).ok_or_else(|| format!("bad timestamp '{}'", field))
}

fn non_empty<'a>(field: &'a str, what: &str) -> ParseResult<&'a str> {
    if field.is_empty() {
        return Err(format!("empty {}", what));
    }
    Ok(field)
}

// --- friends.txt ---

pub fn friendship_record(edge: &Friendship) -> String {
    join_record([edge.a.as_str(), edge.b.as_str()])
}

pub fn parse_friendship(line: &str) -> ParseResult<Friendship> {
    let fields = split_record(line);
    expect_fields(&fields, 2)?;
    let a = non_empty(&fields[0], "username")?;
    let b = non_empty(&fields[1], "username")?;
    if a == b {
        return Err(format!("self friendship for '{}'", a));
    }
    Ok(Friendship::new(a, b))
}

// --- posts.txt ---

pub fn post_record(post: &Post) -> String {
    join_record([
        post.id().to_string().as_str(),
        post.author(),
        post.content(),
        encode_timestamp(&post.created_at()).as_str(),
        post.privacy().code().to_string().as_str(),
        join_list(post.likes()).as_str(),
        join_list(post.tagged_users()).as_str(),
    ])
}

/// Parses a post line. Comments are attached separately.
pub fn parse_post(line: &str) -> ParseResult<Post> {
    let fields = split_record(line);
    expect_fields(&fields, 5)?;

    let id: PostId = fields[0].parse()?;
    let author = non_empty(&fields[1], "author")?;
    let created_at = timestamp(&fields[3])?;
    let privacy = fields[4]
        .trim()
        .parse::<u8>()
        .ok()
        .and_then(Privacy::from_code)
        .ok_or_else(|| format!("bad privacy '{}'", fields[4]))?;

    let mut post = Post::new(id, author, fields[2].as_str(), created_at, privacy);
    if let Some(likes) = fields.get(5) {
        for liker in split_list(likes) {
            post.add_like(&liker);
        }
    }
    if let Some(tagged) = fields.get(6) {
        for user in split_list(tagged) {
            post.tag_user(&user);
        }
    }
    Ok(post)
}

// --- comments.txt ---

/// A comment line, before it is attached to its post.
#[derive(Debug, Clone, PartialEq)]
pub struct CommentRow {
    pub post_id: PostId,
    pub id: CommentId,
    pub parent: Option<CommentId>,
    pub author: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub likes: Vec<String>,
}

pub fn comment_record(post_id: PostId, parent: Option<CommentId>, comment: &Comment) -> String {
    let parent = parent.map(|p| p.to_string()).unwrap_or_default();
    join_record([
        post_id.to_string().as_str(),
        comment.id().to_string().as_str(),
        parent.as_str(),
        comment.author(),
        comment.content(),
        encode_timestamp(&comment.created_at()).as_str(),
        join_list(comment.likes()).as_str(),
    ])
}

pub fn parse_comment(line: &str) -> ParseResult<CommentRow> {
    let fields = split_record(line);
    expect_fields(&fields, 6)?;

    let parent = if fields[2].trim().is_empty() {
        None
    } else {
        Some(fields[2].parse::<CommentId>()?)
    };

    Ok(CommentRow {
        post_id: fields[0].parse()?,
        id: fields[1].parse()?,
        parent,
        author: non_empty(&fields[3], "author")?.to_string(),
        content: fields[4].clone(),
        created_at: timestamp(&fields[5])?,
        likes: fields.get(6).map(|l| split_list(l)).unwrap_or_default(),
    })
}

/// Every comment row of every post, parents before replies.
pub fn comment_records(posts: &[Post]) -> Vec<String> {
    posts
        .iter()
        .flat_map(|post| {
            post.comment_rows()
                .into_iter()
                .map(move |(parent, comment)| comment_record(post.id(), parent, comment))
        })
        .collect()
}

/// Attaches comment rows to their posts. Rows must list parents before replies, which
/// is the order [`comment_records`] writes. Returns the rows that found no home.
pub fn attach_comments(posts: &mut [Post], rows: Vec<CommentRow>) -> Vec<CommentRow> {
    let mut orphans = Vec::new();
    for row in rows {
        let Ok(idx) = posts.binary_search_by_key(&row.post_id, |p| p.id()) else {
            orphans.push(row);
            continue;
        };
        let post = &mut posts[idx];
        if post.comment(row.id).is_some() {
            orphans.push(row);
            continue;
        }

        let comment = match row.parent {
            None => Some(post.add_comment(row.id, &row.author, &row.content, row.created_at)),
            Some(parent) => post
                .comment_mut(parent)
                .map(|p| p.add_reply(row.id, &row.author, &row.content, row.created_at)),
        };
        match comment {
            Some(comment) => {
                for liker in &row.likes {
                    comment.add_like(liker);
                }
            }
            None => orphans.push(row),
        }
    }
    orphans
}

// --- messages.txt ---

pub fn message_record(message: &Message) -> String {
    join_record([
        message.sender.as_str(),
        message.recipient.as_str(),
        message.content.as_str(),
        encode_timestamp(&message.sent_at).as_str(),
    ])
}

pub fn parse_message(line: &str) -> ParseResult<Message> {
    let fields = split_record(line);
    expect_fields(&fields, 4)?;
    Ok(Message::new(
        non_empty(&fields[0], "sender")?,
        non_empty(&fields[1], "recipient")?,
        fields[2].as_str(),
        timestamp(&fields[3])?,
    ))
}
