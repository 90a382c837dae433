use plotters::prelude::*;

/// Cycles through a fixed list of colors, one per plotted element
#[derive(Debug, Clone)]
pub struct ColorSource<C: Clone> {
    colors: Vec<C>,
    index: usize,
}

impl<C: Clone> ColorSource<C> {
    /// Creates a color source; an empty list never yields a color
    pub fn new(colors: Vec<C>) -> Self {
        Self { colors, index: 0 }
    }

    /// Returns the next color, wrapping around at the end of the list
    pub fn next_color(&mut self) -> Option<C> {
        let color = self.colors.get(self.index).cloned()?;
        self.index = (self.index + 1) % self.colors.len();
        Some(color)
    }
}

impl Default for ColorSource<RGBAColor> {
    fn default() -> Self {
        use plotters::style::full_palette;

        Self::new(vec![
            full_palette::BLUE_800.to_rgba(),
            full_palette::RED_600.to_rgba(),
            full_palette::GREEN_700.to_rgba(),
            full_palette::ORANGE.to_rgba(),
            full_palette::PURPLE.to_rgba(),
            full_palette::TEAL.to_rgba(),
            full_palette::BROWN.to_rgba(),
            full_palette::PINK.to_rgba(),
            full_palette::GREY.to_rgba(),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_source_cycles() {
        let mut source = ColorSource::new(vec![1, 2, 3]);
        let colors: Vec<_> = std::iter::from_fn(|| source.next_color()).take(7).collect();
        assert_eq!(colors, vec![1, 2, 3, 1, 2, 3, 1]);

        let mut empty = ColorSource::<u8>::new(Vec::new());
        assert_eq!(empty.next_color(), None);
    }

    #[test]
    fn test_default_palette() {
        let mut source = ColorSource::default();
        let first = source.next_color().unwrap();
        for _ in 0..8 {
            assert_ne!(source.next_color().unwrap(), first);
        }
        assert_eq!(source.next_color().unwrap(), first);
    }
}
