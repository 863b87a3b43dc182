//! Change-block extraction
//!
//! Matches the fixed grammar the model is instructed to emit:
//!
//! ```text
//! <change><search><![CDATA[ ... ]]></search><replace><![CDATA[ ... ]]></replace></change>
//! ```
//!
//! Arbitrary whitespace is tolerated between tags; tag order is fixed and
//! both CDATA wrappers are mandatory. CDATA content is captured verbatim,
//! byte for byte, with no entity decoding. Capture is non-greedy: content
//! ends at the first `]]>` that lets the rest of the block match, so a
//! literal `<![CDATA[` embedded inside the content can truncate the capture.
//! That is accepted behavior, not auto-corrected.

use regex::Regex;

use crate::types::ChangeBlock;

lazy_static::lazy_static! {
    pub static ref CHANGE_BLOCK_REGEX: Regex = Regex::new(
        r"(?s)<change>\s*<search>\s*<!\[CDATA\[(.*?)\]\]>\s*</search>\s*<replace>\s*<!\[CDATA\[(.*?)\]\]>\s*</replace>\s*</change>"
    )
    .expect("change block pattern is valid");
}

/// All non-overlapping change blocks in `buffer`, in document order.
///
/// A buffer with no complete block yields an empty vec; that is not an
/// error, just the absence of a result.
pub fn extract_change_blocks(buffer: &str) -> Vec<ChangeBlock> {
    CHANGE_BLOCK_REGEX
        .captures_iter(buffer)
        .map(|captures| ChangeBlock::new(&captures[1], &captures[2]))
        .collect()
}
