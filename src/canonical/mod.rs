// src/canonical/mod.rs
// Deterministic canonicalization of free-text diagnosis phrases. The output
// string is the matching key for exact recall: two raw strings with the same
// canonical form are treated as the same query.

pub mod tables;

use once_cell::sync::Lazy;
use regex::Regex;

use self::tables::{ABBREVIATIONS, DIGIT_MAP, GREEK_MAP, PHRASE_SUBSTITUTIONS, ROMAN_MAP};

static ALPHA_RUN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new("[a-zA-Z]+").expect("static alpha-run pattern"));
static ROMAN_PREFIX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new("^v?i+v?").expect("static roman prefix pattern"));
static ROMAN_SUFFIX_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new("v?i+v?$").expect("static roman suffix pattern"));

// One boundary-checked pattern per abbreviation, compiled once. The captured
// boundary characters are preserved through the replacement.
static ABBREVIATION_PATTERNS: Lazy<Vec<(&'static str, &'static str, Regex)>> = Lazy::new(|| {
    ABBREVIATIONS
        .iter()
        .map(|&(abbr, expansion)| {
            let pattern = format!("([^a-zA-Z]){}([^a-zA-Z])", regex::escape(abbr));
            let re = Regex::new(&pattern).expect("static abbreviation pattern");
            (abbr, expansion, re)
        })
        .collect()
});

/// Canonicalizes a raw diagnosis phrase. Pure and total: malformed input
/// degrades to a best-effort (possibly empty) canonical string, never an
/// error. Idempotent over its own output.
pub fn canonicalize(raw: &str) -> String {
    // Phase 1: strip quote characters and fold case.
    let mut text = raw.replace('"', " ").to_lowercase();

    // Phase 2: enumeration markers such as "1." collapse to a space.
    text = strip_enumeration_markers(&text);

    // Phase 3: descriptive qualifier phrases collapse to their stand-ins.
    text = collapse_qualifier_phrases(&text);

    // Phase 4: greek letters become their latin transliteration names.
    text = transliterate_greek(&text);

    // Phase 5: roman-numeral glyphs and ideographic digits become latin.
    text = normalize_digit_glyphs(&text);

    // Phase 6: expand clinical abbreviations at word boundaries.
    text = expand_abbreviations(&text);

    // Phase 7: residual lower-case roman numeral runs become arabic digits.
    text = roman_runs_to_arabic(&text);

    // Phase 8: expansion once more, for tokens surfaced by earlier phases.
    text = expand_abbreviations(&text);

    // Phase 9: final case fold (expansions may carry upper-case letters).
    text.to_lowercase()
}

// "1. " / "2." list prefixes: the digit and its trailing period become one
// space; every other character passes through.
fn strip_enumeration_markers(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut idx = 0;
    while idx < chars.len() {
        let ch = chars[idx];
        if ch.is_ascii_digit() && idx + 1 < chars.len() && chars[idx + 1] == '.' {
            out.push(' ');
            idx += 1; // the period is consumed with the digit
        } else {
            out.push(ch);
        }
        idx += 1;
    }
    out
}

fn collapse_qualifier_phrases(text: &str) -> String {
    let mut result = text.to_string();
    for (phrase, stand_in) in &PHRASE_SUBSTITUTIONS {
        result = result.replace(phrase, stand_in);
    }
    result
}

fn transliterate_greek(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match GREEK_MAP.get(&ch) {
            Some(name) => out.push_str(name),
            None => out.push(ch),
        }
    }
    out
}

// Keyed by the uppercase form so lowercase glyph variants ('ⅳ') hit the same
// table entries.
fn normalize_digit_glyphs(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        let upper = ch.to_uppercase().next().unwrap_or(ch);
        match DIGIT_MAP.get(&upper) {
            Some(replacement) => out.push_str(replacement),
            None => out.push(ch),
        }
    }
    out
}

// The string is padded with a space sentinel so abbreviations at the edges
// still see a non-letter boundary on both sides; the sentinel (and any other
// edge spaces) is stripped afterwards.
fn expand_abbreviations(text: &str) -> String {
    let mut padded = format!(" {} ", text);
    for (abbr, expansion, re) in ABBREVIATION_PATTERNS.iter() {
        if *abbr == "＋" {
            padded = padded.replace(abbr, expansion);
        } else {
            let replacement = format!("${{1}}{}${{2}}", expansion);
            padded = re.replace_all(&padded, replacement.as_str()).into_owned();
        }
    }
    padded.trim_matches(' ').to_string()
}

// Within each ASCII-alphabetic run, a roman numeral anchored at the start of
// the run wins over one anchored at the end; only the first occurrence of the
// matched numeral is replaced. Runs whose match is not a recognized numeral
// (e.g. "viv") are left unchanged.
fn roman_runs_to_arabic(text: &str) -> String {
    if !text.contains('i') {
        return text.to_string();
    }
    ALPHA_RUN_RE
        .replace_all(text, |caps: &regex::Captures| {
            let run = &caps[0];
            let matched = ROMAN_PREFIX_RE
                .find(run)
                .or_else(|| ROMAN_SUFFIX_RE.find(run));
            match matched.and_then(|m| ROMAN_MAP.get(m.as_str()).map(|d| (m, *d))) {
                Some((m, digit)) => run.replacen(m.as_str(), digit, 1),
                None => run.to_string(),
            }
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_stripping_and_case_fold() {
        assert_eq!(canonicalize("\"2型糖尿病\""), "2型糖尿病");
        assert_eq!(canonicalize("COPD"), "慢性阻塞性肺疾病");
    }

    #[test]
    fn test_enumeration_markers() {
        assert_eq!(canonicalize("1.高血压"), "高血压");
        assert_eq!(strip_enumeration_markers("1.a 2.b"), " a  b");
        // A digit not followed by a period is preserved.
        assert_eq!(strip_enumeration_markers("2型"), "2型");
    }

    #[test]
    fn test_qualifier_phrase_collapse() {
        assert_eq!(canonicalize("未特指的肺炎"), "未指肺炎");
        assert_eq!(canonicalize("部位未特指的骨折"), "部未指骨折");
    }

    #[test]
    fn test_greek_transliteration() {
        assert_eq!(canonicalize("β受体阻滞剂中毒"), "beta受体阻滞剂中毒");
        assert_eq!(canonicalize("γ链病"), "gamma链病");
    }

    #[test]
    fn test_digit_glyphs() {
        assert_eq!(canonicalize("Ⅱ型呼吸衰竭"), "2型呼吸衰竭");
        assert_eq!(canonicalize("二尖瓣关闭不全"), "2尖瓣关闭不全");
    }

    #[test]
    fn test_abbreviation_expansion_respects_boundaries() {
        assert_eq!(canonicalize("sle伴狼疮肾炎"), "系统性红斑狼疮伴狼疮肾炎");
        // "ou" inside a longer alphabetic token is not an abbreviation.
        assert_eq!(canonicalize("aoux"), "aoux");
        // Fullwidth plus is replaced without boundary checks.
        assert_eq!(canonicalize("冠心病＋心衰"), "冠心病+心衰");
    }

    #[test]
    fn test_roman_numeral_runs() {
        assert_eq!(canonicalize("分期iv"), "分期4");
        assert_eq!(canonicalize("xiii"), "x3");
        // "viv" matches the roman shape but is not a recognized numeral.
        assert_eq!(canonicalize("viv期"), "viv期");
    }

    #[test]
    fn test_malformed_input_degrades() {
        assert_eq!(canonicalize(""), "");
        assert_eq!(canonicalize("\"\""), "");
        assert_eq!(canonicalize("。。、、"), "。。、、");
    }

    #[test]
    fn test_idempotence() {
        let samples = [
            "1.左肺上叶恶性肿瘤",
            "sle（活动期）",
            "Ⅱ型呼吸衰竭",
            "β受体阻滞剂中毒",
            "未特指的肺炎copd急性加重",
            "慢性阻塞性肺疾病iii期",
            "",
        ];
        for sample in samples {
            let once = canonicalize(sample);
            assert_eq!(canonicalize(&once), once, "not idempotent for {:?}", sample);
        }
    }
}
