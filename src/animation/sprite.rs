//! Sprite sheet frame animation
//!
//! A sprite holds named animations, each an ordered list of 1-based frame
//! numbers into a sprite sheet laid out in `columns` columns. Calling
//! [`Sprite::get_source`] once per rendered frame steps the animation and
//! reports which sheet cell to draw.

use glam::{UVec2, Vec2};
use rustc_hash::FxHashMap;

/// Errors raised by sprite animation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpriteError {
    /// No animations were supplied
    NoFrames,
    /// The sheet has zero columns
    ZeroColumns,
    /// Requested animation does not exist
    NotFound(String),
    /// Animation data is not a sequence of frames
    NotASequence(String),
    /// An animation has no frames
    EmptyAnimation(String),
    /// A frame number is not a positive integer
    InvalidFrame {
        /// Animation containing the frame
        animation: String,
        /// Position of the frame in the animation
        position: usize,
    },
    /// Frame data is not an object of animations
    InvalidData(String),
}

impl std::fmt::Display for SpriteError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoFrames => write!(f, "Sprite has no animations"),
            Self::ZeroColumns => write!(f, "Sprite sheet must have at least one column"),
            Self::NotFound(name) => write!(f, "Sprite frame name '{name}' does not exist"),
            Self::NotASequence(name) => {
                write!(f, "Sprite frames '{name}' must be a sequence of frame numbers")
            }
            Self::EmptyAnimation(name) => write!(f, "Sprite frames '{name}' are empty"),
            Self::InvalidFrame {
                animation,
                position,
            } => {
                write!(f, "Frame {position} of '{animation}' is not a positive frame number")
            }
            Self::InvalidData(e) => write!(f, "Invalid sprite data: {e}"),
        }
    }
}

impl std::error::Error for SpriteError {}

/// Frame-based sprite animator
#[derive(Debug, Clone)]
pub struct Sprite {
    /// Animations in the order they were supplied
    animations: Vec<(String, Vec<u32>)>,
    /// Animation name to position in `animations`
    lookup: FxHashMap<String, usize>,
    /// Current animation
    current: usize,
    /// Columns in the sprite sheet
    columns: u32,
    /// Ticks to wait between frames
    delay: u32,
    delay_counter: u32,
    /// Position in the current animation, `None` before the first frame
    cursor: Option<usize>,
    /// `true` while inside a cycle, `false` on its first frame
    state: bool,
    /// Sheet cell of the current frame as (column, row)
    index: Option<Vec2>,
}

impl Sprite {
    /// Ticks between frames when none is given
    pub const DEFAULT_DELAY: u32 = 5;

    /// Create a sprite from named frame lists
    ///
    /// The first animation becomes the current one. A repeated name replaces
    /// the earlier frames.
    ///
    /// # Errors
    ///
    /// Returns an error if there are no animations, `columns` is zero, or an
    /// animation is empty or contains frame `0`
    pub fn new<S: Into<String>>(
        frames: impl IntoIterator<Item = (S, Vec<u32>)>,
        columns: u32,
        delay: u32,
    ) -> Result<Self, SpriteError> {
        if columns == 0 {
            return Err(SpriteError::ZeroColumns);
        }

        let mut animations: Vec<(String, Vec<u32>)> = Vec::new();
        let mut lookup: FxHashMap<String, usize> = FxHashMap::default();
        for (name, sequence) in frames {
            let name = name.into();
            if sequence.is_empty() {
                return Err(SpriteError::EmptyAnimation(name));
            }
            if let Some(position) = sequence.iter().position(|&frame| frame == 0) {
                return Err(SpriteError::InvalidFrame {
                    animation: name,
                    position,
                });
            }
            match lookup.get(&name) {
                Some(&slot) => animations[slot].1 = sequence,
                None => {
                    lookup.insert(name.clone(), animations.len());
                    animations.push((name, sequence));
                }
            }
        }
        if animations.is_empty() {
            return Err(SpriteError::NoFrames);
        }

        Ok(Self {
            animations,
            lookup,
            current: 0,
            columns,
            delay,
            delay_counter: 0,
            cursor: None,
            state: false,
            index: None,
        })
    }

    /// Create a sprite from a JSON object of `name: [frames...]`
    ///
    /// Animations are taken in key order.
    ///
    /// # Errors
    ///
    /// Returns [`SpriteError::NotASequence`] when an animation is not an
    /// array, plus the errors of [`Sprite::new`]
    pub fn from_json(
        value: &serde_json::Value,
        columns: u32,
        delay: u32,
    ) -> Result<Self, SpriteError> {
        let object = value
            .as_object()
            .ok_or_else(|| SpriteError::InvalidData(format!("expected an object, got {value}")))?;

        let mut frames = Vec::with_capacity(object.len());
        for (name, sequence) in object {
            let sequence = sequence
                .as_array()
                .ok_or_else(|| SpriteError::NotASequence(name.clone()))?;
            let sequence = sequence
                .iter()
                .enumerate()
                .map(|(position, frame)| {
                    frame
                        .as_u64()
                        .and_then(|frame| u32::try_from(frame).ok())
                        .ok_or_else(|| SpriteError::InvalidFrame {
                            animation: name.clone(),
                            position,
                        })
                })
                .collect::<Result<Vec<u32>, _>>()?;
            frames.push((name.clone(), sequence));
        }

        Self::new(frames, columns, delay)
    }

    /// Switch to the named animation
    ///
    /// Switching restarts the cycle; selecting the current animation again
    /// leaves it running.
    ///
    /// # Errors
    ///
    /// Returns [`SpriteError::NotFound`] if the name is unknown
    pub fn set_frame(&mut self, name: &str) -> Result<(), SpriteError> {
        let slot = *self
            .lookup
            .get(name)
            .ok_or_else(|| SpriteError::NotFound(name.to_string()))?;
        if slot != self.current {
            self.current = slot;
            self.reset();
        }
        Ok(())
    }

    /// Restart the current animation
    pub fn reset(&mut self) {
        self.delay_counter = 0;
        self.cursor = None;
        self.state = false;
        self.index = None;
    }

    /// Step the animation; call once per rendered frame
    ///
    /// Returns the sheet cell of the current frame as (column, row). The row
    /// is the unfloored quotient `(frame - 1) / columns`; use
    /// [`Sprite::cell`] for integer coordinates.
    pub fn get_source(&mut self) -> Option<Vec2> {
        self.delay_counter = self.delay_counter.saturating_add(1);
        if self.delay_counter > self.delay {
            self.delay_counter = 0;

            let frames = &self.animations[self.current].1;
            let next = self.cursor.map_or(0, |cursor| cursor + 1);
            let next = if next >= frames.len() { 0 } else { next };
            self.cursor = Some(next);
            self.state = next != 0;

            let value = frames[next] - 1;
            self.index = Some(Vec2::new(
                (value % self.columns) as f32,
                value as f32 / self.columns as f32,
            ));
        }
        self.index
    }

    /// Integer sheet cell of the current frame
    #[must_use]
    pub fn cell(&self) -> Option<UVec2> {
        self.index
            .map(|index| UVec2::new(index.x as u32, index.y.floor() as u32))
    }

    /// Sheet cell of the current frame as last published
    #[must_use]
    pub const fn index(&self) -> Option<Vec2> {
        self.index
    }

    /// Name of the current animation
    #[must_use]
    pub fn frame_name(&self) -> &str {
        &self.animations[self.current].0
    }

    /// Position within the current animation
    #[must_use]
    pub const fn frame_index(&self) -> Option<usize> {
        self.cursor
    }

    /// 1-based frame number currently shown
    #[must_use]
    pub fn frame(&self) -> Option<u32> {
        self.cursor
            .map(|cursor| self.animations[self.current].1[cursor])
    }

    /// `false` on the first frame of a cycle, `true` afterwards
    #[must_use]
    pub const fn state(&self) -> bool {
        self.state
    }

    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    #[must_use]
    pub const fn delay(&self) -> u32 {
        self.delay
    }

    pub fn set_delay(&mut self, delay: u32) {
        self.delay = delay;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn walker(delay: u32) -> Sprite {
        Sprite::new([("walk", vec![1, 2, 3, 4]), ("idle", vec![5, 6])], 4, delay).unwrap()
    }

    #[test]
    fn test_frame_cycle() {
        let mut sprite = walker(0);
        let mut frames = Vec::new();
        let mut cursors = Vec::new();
        let mut states = Vec::new();

        for _ in 0..6 {
            sprite.get_source();
            frames.push(sprite.frame().unwrap());
            cursors.push(sprite.frame_index().unwrap());
            states.push(sprite.state());
        }

        assert_eq!(frames, vec![1, 2, 3, 4, 1, 2]);
        assert_eq!(cursors, vec![0, 1, 2, 3, 0, 1]);
        assert_eq!(states, vec![false, true, true, true, false, true]);
    }

    #[test]
    fn test_max_delay_never_advances() {
        let mut sprite = walker(u32::MAX);
        sprite.delay_counter = u32::MAX - 1;
        assert_eq!(sprite.get_source(), None);
        assert_eq!(sprite.get_source(), None);
        assert_eq!(sprite.delay_counter, u32::MAX);
        assert_eq!(sprite.frame_index(), None);
    }

    #[test]
    fn test_delay() {
        let mut sprite = walker(2);
        assert_eq!(sprite.get_source(), None);
        assert_eq!(sprite.get_source(), None);
        assert_eq!(sprite.get_source(), Some(Vec2::new(0.0, 0.0)));
        sprite.get_source();
        sprite.get_source();
        assert_eq!(sprite.frame_index(), Some(0));
        sprite.get_source();
        assert_eq!(sprite.frame_index(), Some(1));
        assert_eq!(sprite.index(), Some(Vec2::new(1.0, 0.25)));
    }

    #[test]
    fn test_source_row_is_unfloored() {
        let mut sprite = walker(0);
        sprite.set_frame("idle").unwrap();
        sprite.get_source();
        sprite.get_source();
        // frame 6 -> value 5 -> column 1, row 5 / 4
        assert_eq!(sprite.index(), Some(Vec2::new(1.0, 1.25)));
        assert_eq!(sprite.cell(), Some(UVec2::new(1, 1)));
    }

    #[test]
    fn test_set_frame() {
        let mut sprite = walker(0);
        assert_eq!(sprite.frame_name(), "walk");

        sprite.get_source();
        sprite.get_source();
        sprite.set_frame("walk").unwrap();
        assert_eq!(sprite.frame_index(), Some(1));

        sprite.set_frame("idle").unwrap();
        assert_eq!(sprite.frame_name(), "idle");
        assert_eq!(sprite.frame_index(), None);

        assert_eq!(
            sprite.set_frame("jump"),
            Err(SpriteError::NotFound("jump".to_string()))
        );
        assert_eq!(sprite.frame_name(), "idle");
    }

    #[test]
    fn test_repeated_name_replaces_frames() {
        let frames = [("walk", vec![1]), ("idle", vec![5]), ("walk", vec![7])];
        let mut sprite = Sprite::new(frames, 4, 0).unwrap();
        assert_eq!(sprite.frame_name(), "walk");
        sprite.get_source();
        assert_eq!(sprite.frame(), Some(7));

        sprite.set_frame("idle").unwrap();
        sprite.get_source();
        assert_eq!(sprite.frame(), Some(5));
    }

    #[test]
    fn test_construction_errors() {
        let none: Vec<(String, Vec<u32>)> = Vec::new();
        assert_eq!(Sprite::new(none, 4, 0).unwrap_err(), SpriteError::NoFrames);
        assert_eq!(
            Sprite::new([("walk", vec![1])], 0, 0).unwrap_err(),
            SpriteError::ZeroColumns
        );
        assert_eq!(
            Sprite::new([("walk", vec![1, 0])], 4, 0).unwrap_err(),
            SpriteError::InvalidFrame {
                animation: "walk".to_string(),
                position: 1,
            }
        );
        assert_eq!(
            Sprite::new([("walk", vec![])], 4, 0).unwrap_err(),
            SpriteError::EmptyAnimation("walk".to_string())
        );
    }

    #[test]
    fn test_from_json() {
        let data = serde_json::json!({ "run": [1, 2], "jump": [3] });
        let sprite = Sprite::from_json(&data, 4, Sprite::DEFAULT_DELAY).unwrap();
        assert_eq!(sprite.delay(), 5);
        assert_eq!(sprite.frame_name(), "jump");

        let data = serde_json::json!({ "run": 3 });
        assert_eq!(
            Sprite::from_json(&data, 4, 0).unwrap_err(),
            SpriteError::NotASequence("run".to_string())
        );

        let data = serde_json::json!({ "run": [1, "two"] });
        assert!(matches!(
            Sprite::from_json(&data, 4, 0),
            Err(SpriteError::InvalidFrame { position: 1, .. })
        ));

        assert!(matches!(
            Sprite::from_json(&serde_json::json!([1, 2]), 4, 0),
            Err(SpriteError::InvalidData(_))
        ));
    }
}
