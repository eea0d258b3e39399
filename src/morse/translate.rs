use super::samples::{Block, SampleSet};

use log::warn;

/// Element of a single character's code.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Symbol {
    Dot,
    Dash,
}

impl Symbol {
    pub fn block(self) -> Block {
        match self {
            Symbol::Dot => Block::Dot,
            Symbol::Dash => Block::Dash,
        }
    }
}

/// International Morse Code for a lower-case letter or a digit.
///
/// Ref: http://en.wikipedia.org/wiki/Morse_code
pub fn pattern(c: char) -> Option<&'static [Symbol]> {
    use Symbol::{Dash as L, Dot as S};

    let symbols: &'static [Symbol] = match c {
        'a' => &[S, L],
        'b' => &[L, S, S, S],
        'c' => &[L, S, L, S],
        'd' => &[L, S, S],
        'e' => &[S],
        'f' => &[S, S, L, S],
        'g' => &[L, L, S],
        'h' => &[S, S, S, S],
        'i' => &[S, S],
        'j' => &[S, L, L, L],
        'k' => &[L, S, L],
        'l' => &[S, L, S, S],
        'm' => &[L, L],
        'n' => &[L, S],
        'o' => &[L, L, L],
        'p' => &[S, L, L, S],
        'q' => &[L, L, S, L],
        'r' => &[S, L, S],
        's' => &[S, S, S],
        't' => &[L],
        'u' => &[S, S, L],
        'v' => &[S, S, S, L],
        'w' => &[S, L, L],
        'x' => &[L, S, S, L],
        'y' => &[L, S, L, L],
        'z' => &[L, L, S, S],
        '1' => &[S, L, L, L, L],
        '2' => &[S, S, L, L, L],
        '3' => &[S, S, S, L, L],
        '4' => &[S, S, S, S, L],
        '5' => &[S, S, S, S, S],
        '6' => &[L, S, S, S, S],
        '7' => &[L, L, S, S, S],
        '8' => &[L, L, L, S, S],
        '9' => &[L, L, L, L, S],
        '0' => &[L, L, L, L, L],
        _ => return None,
    };

    Some(symbols)
}

/// Turns `text` into the sequence of blocks that sends it.
///
/// Text is lower-cased and split on whitespace. Symbols of a character are separated by a
/// character pause, characters by a letter pause and words by a word pause. Characters without a
/// code are logged and skipped; they add no letter pause of their own, but a word made only of
/// them still counts as a word and is separated from its neighbours by word pauses.
pub fn encode(text: &str) -> Vec<Block> {
    let text = text.to_lowercase();
    let words: Vec<Vec<&[Symbol]>> = text.split_whitespace().map(word_patterns).collect();

    let mut blocks = Vec::new();
    for (w, word) in words.iter().enumerate() {
        if w > 0 {
            blocks.push(Block::WordPause);
        }
        for (c, symbols) in word.iter().enumerate() {
            if c > 0 {
                blocks.push(Block::LetterPause);
            }
            for (s, symbol) in symbols.iter().enumerate() {
                if s > 0 {
                    blocks.push(Block::CharacterPause);
                }
                blocks.push(symbol.block());
            }
        }
    }

    blocks
}

fn word_patterns(word: &str) -> Vec<&'static [Symbol]> {
    word.chars()
        .filter_map(|c| {
            let symbols = pattern(c);
            if symbols.is_none() {
                warn!("unknown character: {:?}", c);
            }
            symbols
        })
        .collect()
}

/// Translates `text` into morse code audio by concatenating the blocks of `samples`.
pub fn translate(text: &str, samples: &SampleSet) -> Vec<i16> {
    let blocks = encode(text);
    let len = blocks.iter().map(|&b| samples.block(b).len()).sum();

    let mut out = Vec::with_capacity(len);
    for block in blocks {
        out.extend_from_slice(samples.block(block));
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use super::Block::{CharacterPause as CP, Dash, Dot, LetterPause as LP, WordPause as WP};

    const CODES: &[(char, &str)] = &[
        ('a', ".-"),
        ('b', "-..."),
        ('c', "-.-."),
        ('d', "-.."),
        ('e', "."),
        ('f', "..-."),
        ('g', "--."),
        ('h', "...."),
        ('i', ".."),
        ('j', ".---"),
        ('k', "-.-"),
        ('l', ".-.."),
        ('m', "--"),
        ('n', "-."),
        ('o', "---"),
        ('p', ".--."),
        ('q', "--.-"),
        ('r', ".-."),
        ('s', "..."),
        ('t', "-"),
        ('u', "..-"),
        ('v', "...-"),
        ('w', ".--"),
        ('x', "-..-"),
        ('y', "-.--"),
        ('z', "--.."),
        ('0', "-----"),
        ('1', ".----"),
        ('2', "..---"),
        ('3', "...--"),
        ('4', "....-"),
        ('5', "....."),
        ('6', "-...."),
        ('7', "--..."),
        ('8', "---.."),
        ('9', "----."),
    ];

    fn dots_and_dashes(symbols: &[Symbol]) -> String {
        symbols
            .iter()
            .map(|s| match s {
                Symbol::Dot => '.',
                Symbol::Dash => '-',
            })
            .collect()
    }

    /// Distinct, recognisable blocks so concatenations can be checked sample by sample.
    fn marker_set() -> SampleSet {
        SampleSet {
            dot: vec![1],
            dash: vec![3, 3, 3],
            character_pause: vec![0],
            letter_pause: vec![-3, -3, -3],
            word_pause: vec![-7; 7],
        }
    }

    fn render(blocks: &[Block], set: &SampleSet) -> Vec<i16> {
        blocks.iter().flat_map(|&b| set.block(b).to_vec()).collect()
    }

    #[test]
    fn table_matches_international_code() {
        for &(c, code) in CODES {
            let symbols = pattern(c).unwrap_or_else(|| panic!("no pattern for {:?}", c));
            assert_eq!(dots_and_dashes(symbols), code, "{:?}", c);
        }
    }

    #[test]
    fn nothing_else_has_a_pattern() {
        for c in ['!', ' ', 'A', 'é', '.', '?'].iter() {
            assert!(pattern(*c).is_none(), "{:?}", c);
        }
    }

    #[test]
    fn sos() {
        assert_eq!(
            encode("sos"),
            vec![Dot, CP, Dot, CP, Dot, LP, Dash, CP, Dash, CP, Dash, LP, Dot, CP, Dot, CP, Dot]
        );
    }

    #[test]
    fn words_are_separated_by_one_word_pause() {
        assert_eq!(
            encode("a b"),
            vec![Dot, CP, Dash, WP, Dash, CP, Dot, CP, Dot, CP, Dot]
        );
        assert_eq!(encode("  a \t\n b  "), encode("a b"));
    }

    #[test]
    fn unknown_characters_are_skipped() {
        let a = encode("a");
        let one = encode("1");
        let b = encode("b");
        let expected: Vec<Block> = [a, vec![LP], one, vec![LP], b].concat();
        assert_eq!(encode("a1!b"), expected);
    }

    #[test]
    fn unknown_only_words_keep_their_word_pause() {
        let expected: Vec<Block> = [encode("a"), vec![WP, WP], encode("b")].concat();
        assert_eq!(encode("a !? b"), expected);
        let word_pauses = encode("a !? b").into_iter().filter(|&b| b == WP).count();
        assert_eq!(word_pauses, 2);
        assert!(encode("!!!").is_empty());
        assert!(encode("").is_empty());
        assert!(encode("   ").is_empty());
    }

    #[test]
    fn upper_case_is_folded() {
        assert_eq!(encode("SOS"), encode("sos"));
    }

    #[test]
    fn translate_concatenates_blocks() {
        let set = marker_set();
        assert_eq!(
            translate("et e", &set),
            vec![1, -3, -3, -3, 3, 3, 3, -7, -7, -7, -7, -7, -7, -7, 1]
        );
        assert_eq!(translate("sos", &set), render(&encode("sos"), &set));
    }

    #[test]
    fn translate_is_deterministic() {
        let set = SampleSet::new(8000, 2, 20, 70, 440.0);
        let text = "The quick brown fox 1234";
        let first = translate(text, &set);
        assert_eq!(first, translate(text, &set));
        assert_eq!(first.len(), render(&encode(text), &set).len());
    }
}
