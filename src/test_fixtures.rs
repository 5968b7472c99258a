//! Shared fixtures for the trie and proof tests.
//!
//! The fruits dataset and its root digest come from the aiken-lang
//! merkle-patricia-forestry test suite; proof wire vectors over the same
//! dataset live in `proof::wire`.

use crate::trie::Trie;

/// The 30-entry fruits dataset: textual keys bound to emoji values.
pub(crate) fn fruits() -> &'static [(&'static str, &'static str)] {
    &[
        ("apple[uid: 58]", "\u{1F34E}"),
        ("apricot[uid: 0]", "\u{1F937}"),
        ("banana[uid: 218]", "\u{1F34C}"),
        ("blueberry[uid: 0]", "\u{1FAD0}"),
        ("cherry[uid: 0]", "\u{1F352}"),
        ("coconut[uid: 0]", "\u{1F965}"),
        ("cranberry[uid: 0]", "\u{1F937}"),
        ("fig[uid: 68267]", "\u{1F937}"),
        ("grapefruit[uid: 0]", "\u{1F937}"),
        ("grapes[uid: 0]", "\u{1F347}"),
        ("guava[uid: 344]", "\u{1F937}"),
        ("kiwi[uid: 0]", "\u{1F95D}"),
        ("kumquat[uid: 0]", "\u{1F937}"),
        ("lemon[uid: 0]", "\u{1F34B}"),
        ("lime[uid: 0]", "\u{1F937}"),
        ("mango[uid: 0]", "\u{1F96D}"),
        ("orange[uid: 0]", "\u{1F34A}"),
        ("papaya[uid: 0]", "\u{1F937}"),
        ("passionfruit[uid: 0]", "\u{1F937}"),
        ("peach[uid: 0]", "\u{1F351}"),
        ("pear[uid: 0]", "\u{1F350}"),
        ("pineapple[uid: 12577]", "\u{1F34D}"),
        ("plum[uid: 15492]", "\u{1F937}"),
        ("pomegranate[uid: 0]", "\u{1F937}"),
        ("raspberry[uid: 0]", "\u{1F937}"),
        ("strawberry[uid: 2532]", "\u{1F353}"),
        ("tangerine[uid: 11]", "\u{1F34A}"),
        ("tomato[uid: 83468]", "\u{1F345}"),
        ("watermelon[uid: 0]", "\u{1F349}"),
        ("yuzu[uid: 0]", "\u{1F937}"),
    ]
}

/// A trie loaded with the full fruits dataset, in listed order.
pub(crate) fn fruits_trie() -> Trie {
    let mut trie = Trie::new();
    for (key, value) in fruits() {
        trie.set(key.as_bytes(), value.as_bytes());
    }
    trie
}
