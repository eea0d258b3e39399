use super::tone::{fill_sine, to_pcm};

/// One of the five building blocks every morse message is assembled from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Block {
    /// Tone of 1 unit.
    Dot,
    /// Tone of 3 units.
    Dash,
    /// Silence of 1 unit between the parts of a single character.
    CharacterPause,
    /// Silence of 3 units between characters.
    LetterPause,
    /// Silence of 7 units between words.
    WordPause,
}

impl Block {
    pub const ALL: [Block; 5] = [
        Block::Dot,
        Block::Dash,
        Block::CharacterPause,
        Block::LetterPause,
        Block::WordPause,
    ];

    /// Length in units.
    pub fn units(self) -> u32 {
        match self {
            Block::Dot | Block::CharacterPause => 1,
            Block::Dash | Block::LetterPause => 3,
            Block::WordPause => 7,
        }
    }

    pub fn is_tone(self) -> bool {
        matches!(self, Block::Dot | Block::Dash)
    }
}

/// Interleaved 16-bit PCM for each `Block`, all at one rate, channel count, pitch and volume.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SampleSet {
    pub dot: Vec<i16>,
    pub dash: Vec<i16>,
    pub character_pause: Vec<i16>,
    pub letter_pause: Vec<i16>,
    pub word_pause: Vec<i16>,
}

impl SampleSet {
    /// Renders the blocks for a unit of `unit_millis` milliseconds. `volume_percent` is expected
    /// in 0..=100.
    pub fn new(
        rate: u32,
        channels: u16,
        unit_millis: u32,
        volume_percent: u32,
        frequency: f64,
    ) -> Self {
        let volume = volume_percent as f64 * 0.01;
        let render = |block: Block| {
            let mut samples = vec![0.0; block_len(rate, unit_millis, block)];
            if block.is_tone() {
                fill_sine(&mut samples, rate, volume, frequency);
            }
            to_pcm(&samples, channels as usize)
        };

        SampleSet {
            dot: render(Block::Dot),
            dash: render(Block::Dash),
            character_pause: render(Block::CharacterPause),
            letter_pause: render(Block::LetterPause),
            word_pause: render(Block::WordPause),
        }
    }

    pub fn block(&self, block: Block) -> &[i16] {
        match block {
            Block::Dot => &self.dot,
            Block::Dash => &self.dash,
            Block::CharacterPause => &self.character_pause,
            Block::LetterPause => &self.letter_pause,
            Block::WordPause => &self.word_pause,
        }
    }
}

/// Mono samples in `block`: `ceil(rate * unit_seconds * units)`.
pub fn block_len(rate: u32, unit_millis: u32, block: Block) -> usize {
    let unit_seconds = unit_millis as f64 * 0.001;
    (rate as f64 * unit_seconds * block.units() as f64).ceil() as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_lengths_follow_unit_ratios() {
        for &(rate, channels, unit) in &[
            (8000, 2, 50),
            (44100, 1, 10),
            (22050, 6, 120),
            (8000, 3, 1),
        ] {
            let set = SampleSet::new(rate, channels, unit, 100, 440.0);
            for &block in Block::ALL.iter() {
                let expected = block_len(rate, unit, block) * channels as usize;
                assert_eq!(set.block(block).len(), expected, "{:?}", block);
            }
        }
    }

    #[test]
    fn default_settings_lengths() {
        let set = SampleSet::new(8000, 2, 50, 100, 369.99);
        assert_eq!(set.dot.len(), 800);
        assert_eq!(set.dash.len(), 2400);
        assert_eq!(set.character_pause.len(), 800);
        assert_eq!(set.letter_pause.len(), 2400);
        assert_eq!(set.word_pause.len(), 5600);
    }

    #[test]
    fn lengths_round_up() {
        // 1500 Hz * 1 ms = 1.5 samples.
        assert_eq!(block_len(1500, 1, Block::Dot), 2);
        assert_eq!(block_len(1500, 1, Block::Dash), 5);
        assert_eq!(block_len(1000, 1, Block::Dot), 1);
    }

    #[test]
    fn pauses_are_silent_and_tones_are_not() {
        let set = SampleSet::new(8000, 2, 50, 100, 440.0);
        assert!(set.character_pause.iter().all(|&s| s == 0));
        assert!(set.letter_pause.iter().all(|&s| s == 0));
        assert!(set.word_pause.iter().all(|&s| s == 0));
        assert!(set.dot.iter().any(|&s| s != 0));
        assert!(set.dash.iter().any(|&s| s < 0));
    }

    #[test]
    fn dash_starts_like_dot() {
        let set = SampleSet::new(8000, 1, 50, 80, 440.0);
        assert_eq!(&set.dash[..set.dot.len()], &set.dot[..]);
    }

    #[test]
    fn degenerate_inputs_do_not_panic() {
        let set = SampleSet::new(8000, 2, 0, 100, 440.0);
        assert!(Block::ALL.iter().all(|&b| set.block(b).is_empty()));

        let set = SampleSet::new(8000, 2, 50, 0, 440.0);
        assert!(set.dot.iter().all(|&s| s == 0));

        let set = SampleSet::new(8000, 2, 50, 100, 0.0);
        assert!(set.dash.iter().all(|&s| s == 0));
    }
}
