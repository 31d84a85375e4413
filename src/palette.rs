use crate::error::{Error, Result};
use image::{imageops::ColorMap, Rgb};
use std::fmt;
use std::ops::Index;
use std::slice;

/// One puzzle color: the rounded mean of a median-cut bucket.
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PaletteEntry {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl PaletteEntry {
    #[inline]
    pub fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Perceptual brightness used to number the palette.
    #[inline]
    pub fn luminance(&self) -> f64 {
        0.299 * self.r as f64 + 0.587 * self.g as f64 + 0.114 * self.b as f64
    }

    #[inline]
    pub fn rgb(&self) -> Rgb<u8> {
        Rgb::from([self.r, self.g, self.b])
    }

    /// `#rrggbb`, lowercase.
    pub fn hex(&self) -> String {
        self.to_string()
    }

    #[inline]
    fn distance(&self, rgb: Rgb<u8>) -> u32 {
        let dr = rgb[0] as i32 - self.r as i32;
        let dg = rgb[1] as i32 - self.g as i32;
        let db = rgb[2] as i32 - self.b as i32;
        (dr * dr + dg * dg + db * db) as u32
    }
}

impl From<Rgb<u8>> for PaletteEntry {
    fn from(rgb: Rgb<u8>) -> Self {
        Self::new(rgb[0], rgb[1], rgb[2])
    }
}

impl fmt::Display for PaletteEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Index of the palette color closest to `sample` in RGB space.
///
/// Ties go to the lowest index.
pub fn nearest_index(sample: Rgb<u8>, entries: &[PaletteEntry]) -> Result<usize> {
    let mut best = None;
    for (i, entry) in entries.iter().enumerate() {
        let d = entry.distance(sample);
        match best {
            Some((_, best_d)) if d >= best_d => {}
            _ => best = Some((i, d)),
        }
    }
    best.map(|(i, _)| i).ok_or(Error::EmptyPalette)
}

/// Palette ordered by luminance; index 0 is shown to the player as "1".
#[derive(Default, Clone, Debug, PartialEq, Eq)]
pub struct Palette {
    entries: Vec<PaletteEntry>,
}

impl Palette {
    pub fn new(entries: Vec<PaletteEntry>) -> Self {
        Self { entries }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn get(&self, index: usize) -> Option<&PaletteEntry> {
        self.entries.get(index)
    }

    #[inline]
    pub fn entries(&self) -> &[PaletteEntry] {
        &self.entries
    }

    #[inline]
    pub fn iter(&self) -> slice::Iter<'_, PaletteEntry> {
        self.entries.iter()
    }

    #[inline]
    pub fn nearest_index(&self, sample: Rgb<u8>) -> Result<usize> {
        nearest_index(sample, &self.entries)
    }
}

impl Index<usize> for Palette {
    type Output = PaletteEntry;

    fn index(&self, index: usize) -> &PaletteEntry {
        &self.entries[index]
    }
}

impl<'a> IntoIterator for &'a Palette {
    type Item = &'a PaletteEntry;
    type IntoIter = slice::Iter<'a, PaletteEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl ColorMap for Palette {
    type Color = Rgb<u8>;

    #[inline(always)]
    fn index_of(&self, color: &Self::Color) -> usize {
        self.nearest_index(*color).unwrap_or(0)
    }

    #[inline(always)]
    fn lookup(&self, index: usize) -> Option<Self::Color> {
        self.get(index).map(PaletteEntry::rgb)
    }

    fn has_lookup(&self) -> bool {
        true
    }

    #[inline(always)]
    fn map_color(&self, color: &mut Self::Color) {
        if let Ok(i) = self.nearest_index(*color) {
            *color = self.entries[i].rgb();
        }
    }
}
