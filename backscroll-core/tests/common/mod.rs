// Thread pages shaped like the host's: one list cell per post, 300px each
#![allow(dead_code)]

use backscroll_page::Viewport;

pub const THREAD_ONE_URL: &str = "https://site/alice/status/1";
pub const THREAD_TWO_URL: &str = "https://site/carol/status/2";
pub const HOME_URL: &str = "https://site/home";

pub const LIGHT_BODY: &str = "background-color: rgb(255, 255, 255)";
pub const DARK_BODY: &str = "background-color: rgb(21, 32, 43)";
pub const POST_BACKGROUND: &str = "rgba(0, 0, 0, 0)";

pub const VIEWPORT: Viewport = Viewport {
    width: 600.0,
    height: 800.0,
};

#[derive(Debug, Clone)]
pub struct PostData {
    pub username: String,
    pub name: String,
    pub time: String,
    pub text: String,
}

pub fn post(handle: &str, second: u32, text: &str) -> PostData {
    let mut name = handle.to_string();
    if let Some(first) = name.get_mut(0..1) {
        first.make_ascii_uppercase();
    }
    PostData {
        username: format!("@{}", handle),
        name,
        time: format!("2024-05-01T10:00:{:02}.000Z", second),
        text: text.to_string(),
    }
}

pub fn article(post: &PostData) -> String {
    format!(
        r#"<article data-testid="tweet" style="background-color: {bg}">
            <div data-testid="User-Name">
                <div><a href="/{handle}"><span>{name}</span></a></div>
                <div><a href="/{handle}" tabindex="-1"><span>{username}</span></a><time datetime="{time}">May 1</time></div>
            </div>
            <div data-testid="tweetText"><span>{text}</span></div>
        </article>"#,
        bg = POST_BACKGROUND,
        handle = post.username.trim_start_matches('@'),
        name = post.name,
        username = post.username,
        time = post.time,
        text = post.text,
    )
}

pub fn cell(content: &str) -> String {
    format!(
        r#"<div data-testid="cellInnerDiv" style="height: 300px"><div>{}</div></div>"#,
        content
    )
}

pub fn composer() -> String {
    r#"<div class="DraftEditor-root"><div contenteditable="true" role="textbox"></div></div>"#
        .to_string()
}

/// Focal post of a thread with the reply composer under it
pub fn focal_cell(post: &PostData) -> String {
    cell(&format!("{}{}", article(post), composer()))
}

pub fn reply_cell(post: &PostData) -> String {
    cell(&article(post))
}

/// Cell the host uses for separators and "show more" links
pub fn spacer_cell() -> String {
    cell(r#"<div role="separator"></div>"#)
}

pub fn document(body_style: &str, cells: &[String]) -> String {
    format!(
        r#"<!DOCTYPE html><html><head><title>Thread</title></head><body style="{}">
            <main role="main"><div aria-label="Timeline: Conversation">{}</div></main>
        </body></html>"#,
        body_style,
        cells.concat()
    )
}

pub fn alice_post() -> PostData {
    post("alice", 0, "what is everyone reading this week?")
}

pub fn carol_post() -> PostData {
    post("carol", 3, "a history of the printing press")
}

/// Alice's thread; at scroll 400 the first visible post is carol's reply
pub fn thread_one(body_style: &str) -> String {
    let cells = vec![
        focal_cell(&alice_post()),
        reply_cell(&post("bob", 2, "nothing, sadly")),
        reply_cell(&carol_post()),
        reply_cell(&post("dave", 4, "rereading dune")),
        reply_cell(&post("erin", 5, "the rust book")),
        reply_cell(&post("frank", 6, "a cookbook")),
        reply_cell(&post("grace", 7, "poetry")),
        reply_cell(&post("heidi", 8, "same as erin")),
    ];
    document(body_style, &cells)
}

/// Alice's thread after carol's reply was deleted
pub fn thread_one_without_carol(body_style: &str) -> String {
    let cells = vec![
        focal_cell(&alice_post()),
        reply_cell(&post("bob", 2, "nothing, sadly")),
        reply_cell(&post("dave", 4, "rereading dune")),
        reply_cell(&post("erin", 5, "the rust book")),
        reply_cell(&post("frank", 6, "a cookbook")),
        reply_cell(&post("grace", 7, "poetry")),
        reply_cell(&post("heidi", 8, "same as erin")),
    ];
    document(body_style, &cells)
}

/// Carol's post opened from alice's thread
pub fn thread_two(body_style: &str) -> String {
    let cells = vec![
        reply_cell(&alice_post()),
        focal_cell(&carol_post()),
        reply_cell(&post("ivan", 20, "great pick")),
        reply_cell(&post("judy", 21, "seconded")),
        spacer_cell(),
        reply_cell(&post("mallory", 22, "meh")),
    ];
    document(body_style, &cells)
}

/// Carol's post where replies are restricted: no composer anywhere
pub fn thread_two_replies_restricted(body_style: &str) -> String {
    let cells = vec![
        reply_cell(&alice_post()),
        reply_cell(&carol_post()),
        reply_cell(&post("ivan", 20, "great pick")),
    ];
    document(body_style, &cells)
}

/// Placeholder the host shows while a route is loading: no composer, no posts
pub fn loading_shell(body_style: &str) -> String {
    format!(
        r#"<html><body style="{}"><div role="progressbar" style="height: 100px"></div></body></html>"#,
        body_style
    )
}

/// Tall page with no timeline at all
pub fn blank_page(body_style: &str) -> String {
    format!(
        r#"<html><body style="{}"><div style="height: 3000px"></div></body></html>"#,
        body_style
    )
}
