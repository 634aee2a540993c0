//! Name ordering for circle pickers, approximating zh-CN collation: symbols,
//! then digits, then Latin letters case-insensitively, then Han characters by
//! pinyin (tone number breaks ties between homophones).

use std::cmp::Ordering;

use pinyin::ToPinyin;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum CharGroup {
    Symbol,
    Digit,
    Latin,
    Han,
    Other,
}

fn char_key(ch: char) -> (CharGroup, String) {
    if ch.is_ascii_digit() {
        return (CharGroup::Digit, ch.to_string());
    }
    if ch.is_ascii_alphabetic() {
        return (CharGroup::Latin, ch.to_ascii_lowercase().to_string());
    }
    if let Some(pinyin) = ch.to_pinyin() {
        return (CharGroup::Han, pinyin.with_tone_num_end().to_string());
    }
    if ch.is_whitespace() || ch.is_ascii_punctuation() {
        return (CharGroup::Symbol, ch.to_string());
    }
    (CharGroup::Other, ch.to_string())
}

fn sort_key(value: &str) -> Vec<(CharGroup, String)> {
    value.chars().map(char_key).collect()
}

pub fn compare_zh(a: &str, b: &str) -> Ordering {
    sort_key(a).cmp(&sort_key(b)).then_with(|| a.cmp(b))
}
