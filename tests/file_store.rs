use friendbook::api::Friendbook;
use friendbook::config::FriendbookConfig;
use friendbook::model::Privacy;
use friendbook::store::fs::{FileStore, MESSAGES_FILE, POSTS_FILE, USERS_FILE};
use friendbook::store::DataStore;
use std::path::Path;

fn open(dir: &Path) -> Friendbook<FileStore> {
    Friendbook::open(FileStore::new(dir), FriendbookConfig::empty()).unwrap()
}

fn befriended(dir: &Path) -> Friendbook<FileStore> {
    let mut api = open(dir);
    api.register("alice", "alice@x.com", "pw1", "female").unwrap();
    api.register("bob", "bob@x.com", "pw2", "male").unwrap();
    api.login("alice@x.com", "pw1").unwrap();
    api.send_friend_request("bob").unwrap();
    api.logout().unwrap();
    api.login("bob@x.com", "pw2").unwrap();
    api.accept_friend_request("alice").unwrap();
    api
}

#[test]
fn delimiters_in_content_round_trip() {
    let temp = tempfile::tempdir().unwrap();
    let tricky = "a|b, c\\d\nsecond line";
    {
        let mut api = befriended(temp.path());
        let id = api.create_post(tricky).unwrap();
        api.comment_on_post(id, "pipes | everywhere").unwrap();
        api.send_message("alice", "x|y").unwrap();
        api.logout().unwrap();
    }

    let raw = std::fs::read_to_string(temp.path().join(POSTS_FILE)).unwrap();
    assert_eq!(raw.lines().count(), 1);

    let mut api = open(temp.path());
    assert_eq!(api.posts()[0].content(), tricky);
    assert_eq!(api.posts()[0].comments()[0].content(), "pipes | everywhere");
    api.login("alice@x.com", "pw1").unwrap();
    assert_eq!(api.messages_with("bob").unwrap()[0].content, "x|y");
}

#[test]
fn comments_likes_and_tags_survive_restart() {
    let temp = tempfile::tempdir().unwrap();
    let (post, comment) = {
        let mut api = befriended(temp.path());
        let post = api
            .create_post_with_privacy("weekend plans", Privacy::FriendsOnly)
            .unwrap();
        let comment = api.comment_on_post(post, "who's in?").unwrap();
        api.tag_user(post, "alice").unwrap();
        api.logout().unwrap();

        api.login("alice@x.com", "pw1").unwrap();
        api.like_post(post).unwrap();
        api.reply_to_comment(post, comment, "me!").unwrap();
        api.like_comment(post, comment).unwrap();
        api.logout().unwrap();
        (post, comment)
    };

    let api = open(temp.path());
    let loaded = api.post(post).unwrap();
    assert_eq!(loaded.author(), "bob");
    assert_eq!(loaded.privacy(), Privacy::FriendsOnly);
    assert_eq!(loaded.likes(), ["alice"]);
    assert_eq!(loaded.tagged_users(), ["alice"]);
    assert_eq!(loaded.comment_count(), 2);

    let top = loaded.comment(comment).unwrap();
    assert_eq!(top.likes(), ["alice"]);
    assert_eq!(top.replies()[0].author(), "alice");
    assert_eq!(top.replies()[0].content(), "me!");
}

#[test]
fn messages_keep_order_and_participants() {
    let temp = tempfile::tempdir().unwrap();
    {
        let mut api = befriended(temp.path());
        api.send_message("alice", "hi").unwrap();
        api.logout().unwrap();
        api.login("alice@x.com", "pw1").unwrap();
        api.send_message("bob", "hey").unwrap();
        api.send_message("bob", "what's up").unwrap();
        api.logout().unwrap();
    }

    let raw = std::fs::read_to_string(temp.path().join(MESSAGES_FILE)).unwrap();
    assert_eq!(raw.lines().count(), 3);

    let mut api = open(temp.path());
    api.login("bob@x.com", "pw2").unwrap();
    let thread: Vec<(&str, &str)> = api
        .messages_with("alice")
        .unwrap()
        .iter()
        .map(|m| (m.sender.as_str(), m.content.as_str()))
        .collect();
    assert_eq!(
        thread,
        [("bob", "hi"), ("alice", "hey"), ("alice", "what's up")]
    );
    let chats = api.conversations().unwrap();
    assert_eq!(chats.len(), 1);
    assert_eq!(chats[0].0, "alice");
}

#[test]
fn writes_leave_no_temp_files() {
    let temp = tempfile::tempdir().unwrap();
    {
        let mut api = befriended(temp.path());
        api.create_post("hello").unwrap();
        api.logout().unwrap();
    }

    let leftovers: Vec<String> = std::fs::read_dir(temp.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .filter(|name| name.ends_with(".tmp"))
        .collect();
    assert!(leftovers.is_empty(), "left behind: {:?}", leftovers);
    assert!(temp.path().join(USERS_FILE).exists());
}

#[test]
fn friendship_edges_are_written_once() {
    let temp = tempfile::tempdir().unwrap();
    drop(befriended(temp.path()));

    let store = FileStore::new(temp.path());
    let edges = store.load_friendships().unwrap();
    assert_eq!(edges.len(), 1);
    assert_eq!(edges[0].a, "alice");
    assert_eq!(edges[0].b, "bob");
}

#[test]
fn passwords_with_delimiters_still_log_in() {
    let temp = tempfile::tempdir().unwrap();
    {
        let mut api = open(temp.path());
        api.register("carol", "carol@x.com", "p|a,s\\s", "").unwrap();
    }

    let mut api = open(temp.path());
    api.login("carol@x.com", "p|a,s\\s").unwrap();
}
