//! Navigation specs
//!
//! Chapter moves persist immediately; scroll offsets are restored when a
//! chapter is revisited.

use crate::prelude::*;

#[test]
fn next_and_prev_move_one_chapter() {
    let temp = Project::empty();
    temp.novel().args(&["nav", "next"]).passes().stdout_eq("Chapter 1 (scroll 0)\n");
    temp.novel().args(&["nav", "next"]).passes().stdout_has("Chapter 2");
    temp.novel().args(&["nav", "prev"]).passes().stdout_has("Chapter 1");

    let reading = temp.slice(READING_STATE_KEY).unwrap();
    assert_eq!(reading["currentChapterIndex"], 1);
}

#[test]
fn prev_at_first_chapter_fails() {
    let temp = Project::empty();
    temp.novel()
        .args(&["nav", "prev"])
        .fails()
        .stderr_has("already at the first chapter");
}

#[test]
fn revisiting_a_chapter_restores_its_scroll() {
    let temp = Project::empty();
    temp.novel().args(&["nav", "goto", "3"]).passes();
    temp.novel().args(&["scroll", "640"]).passes().stdout_has("Chapter 3 scroll 640");
    temp.novel().args(&["nav", "goto", "1"]).passes().stdout_has("scroll 0");
    temp.novel()
        .args(&["nav", "goto", "3"])
        .passes()
        .stdout_eq("Chapter 3 (scroll 640)\n");

    let reading = temp.slice(READING_STATE_KEY).unwrap();
    assert_eq!(reading["chapterProgress"]["3"]["scrollPosition"], 640);
}

#[test]
fn visited_chapters_are_recorded_once() {
    let temp = Project::empty();
    for chapter in ["2", "5", "2"] {
        temp.novel().args(&["nav", "goto", chapter]).passes();
    }
    let session = temp.slice(SESSION_DATA_KEY).unwrap();
    assert_eq!(session["chaptersVisited"], json!([2, 5]));
    assert_eq!(session["visitCount"], 3);
}

#[test]
fn content_directory_bounds_navigation() {
    let temp = Project::empty();
    temp.file("book/chapters.json", CHAPTERS_JSON);
    let book = temp.path().join("book");

    temp.novel()
        .content(&book)
        .args(&["nav", "next"])
        .passes()
        .stdout_eq("Chapter 1: Middle (scroll 0)\n");
    temp.novel()
        .content(&book)
        .args(&["nav", "next"])
        .fails()
        .stderr_has("already at the last chapter");
    temp.novel()
        .content(&book)
        .args(&["nav", "goto", "5"])
        .fails()
        .stderr_has("chapter 5 is out of range (2 chapters)");
}

#[test]
fn toc_lists_chapters_in_order() {
    let temp = Project::empty();
    temp.file("book/chapters.json", CHAPTERS_JSON);

    temp.novel()
        .content(&temp.path().join("book"))
        .args(&["toc"])
        .passes()
        .stdout_eq("   0  Opening\n   1  Middle - In which things happen\n");
}

#[test]
fn navigation_json_output() {
    let temp = Project::empty();
    let run = temp.novel().args(&["--output", "json", "nav", "goto", "2"]).passes();
    let value = run.json();
    assert_eq!(value["chapter"], 2);
    assert_eq!(value["restoreScroll"], 0);
}
