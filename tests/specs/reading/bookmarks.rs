//! Bookmark specs

use crate::prelude::*;

fn bookmark_ids(temp: &Project) -> Vec<String> {
    let run = temp.novel().args(&["--output", "json", "bookmark", "list"]).passes();
    run.json()
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["id"].as_str().unwrap().to_string())
        .collect()
}

#[test]
fn bookmark_captures_chapter_and_scroll() {
    let temp = Project::empty();
    temp.novel().args(&["nav", "goto", "2"]).passes();
    temp.novel().args(&["scroll", "300"]).passes();
    temp.novel()
        .args(&["bookmark", "add", "--note", "great line"])
        .passes()
        .stdout_has("great line");

    temp.novel()
        .args(&["bookmark", "list"])
        .passes()
        .stdout_has("ch 2")
        .stdout_has("scroll 300")
        .stdout_has("great line");

    let run = temp.novel().args(&["--output", "json", "bookmark", "list"]).passes();
    let list = run.json();
    assert_eq!(list[0]["chapterIndex"], 2);
    assert_eq!(list[0]["scrollPosition"], 300);
    assert_eq!(list[0]["note"], "great line");
}

#[test]
fn list_filters_by_chapter() {
    let temp = Project::empty();
    temp.novel().args(&["bookmark", "add"]).passes();
    temp.novel().args(&["nav", "goto", "4"]).passes();
    temp.novel().args(&["bookmark", "add"]).passes();

    let run = temp
        .novel()
        .args(&["--output", "json", "bookmark", "list", "--chapter", "4"])
        .passes();
    let list = run.json();
    assert_eq!(list.as_array().unwrap().len(), 1);
    assert_eq!(list[0]["chapterIndex"], 4);
}

#[test]
fn bookmark_can_be_opened_and_removed() {
    let temp = Project::empty();
    temp.novel().args(&["nav", "goto", "2"]).passes();
    temp.novel().args(&["scroll", "300"]).passes();
    temp.novel().args(&["bookmark", "add"]).passes();
    let id = bookmark_ids(&temp).remove(0);

    temp.novel().args(&["nav", "goto", "0"]).passes();
    temp.novel()
        .args(&["nav", "bookmark", &id])
        .passes()
        .stdout_eq("Chapter 2 (scroll 300)\n");

    temp.novel()
        .args(&["bookmark", "remove", &id])
        .passes()
        .stdout_has("Removed bookmark");
    temp.novel()
        .args(&["bookmark", "list"])
        .passes()
        .stdout_eq("No bookmarks\n");
}

#[test]
fn removing_unknown_bookmark_fails() {
    let temp = Project::empty();
    temp.novel()
        .args(&["bookmark", "remove", "missing"])
        .fails()
        .stderr_has("bookmark 'missing' not found");
}
