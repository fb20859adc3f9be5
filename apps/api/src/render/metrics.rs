//! Static glyph-width tables for the two standard PDF fonts used by the renderer.
//!
//! Widths come from the Adobe core-14 AFM files, in thousandths of an em.
//! Tables cover ASCII 0x20..=0x7E (95 printable characters); index = (char as usize) - 32.
//! Other Latin-1 characters fall back to `average_width`.
//!
//! Width array slot layout:
//! ```text
//! [0]=sp  [1]=!   [2]="   [3]=#   [4]=$   [5]=%   [6]=&   [7]='
//! [8]=(   [9]=)   [10]=*  [11]=+  [12]=,  [13]=-  [14]=.  [15]=/
//! [16..25]=0-9
//! [26]=:  [27]=;  [28]=<  [29]==  [30]=>  [31]=?  [32]=@
//! [33..58]=A-Z
//! [59]=[  [60]=\  [61]=]  [62]=^  [63]=_  [64]=`
//! [65..90]=a-z
//! [91]={  [92]=|  [93]=}  [94]=~
//! ```

/// The fonts the renderer emits. Both are core-14, so nothing is embedded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Font {
    Helvetica,
    HelveticaBold,
}

impl Font {
    /// PostScript name written into the font dictionary.
    pub fn base_font(self) -> &'static str {
        match self {
            Font::Helvetica => "Helvetica",
            Font::HelveticaBold => "Helvetica-Bold",
        }
    }

    /// Resource name used in content streams.
    pub fn resource_name(self) -> &'static str {
        match self {
            Font::Helvetica => "F1",
            Font::HelveticaBold => "F2",
        }
    }
}

pub struct FontMetricTable {
    widths: [u16; 95],
    pub average_width: u16,
}

impl FontMetricTable {
    /// Width of `s` in points when set at `size_pt`.
    pub fn measure_str(&self, s: &str, size_pt: f32) -> f32 {
        let units: u32 = s
            .chars()
            .map(|c| {
                let code = c as usize;
                if (32..=126).contains(&code) {
                    self.widths[code - 32] as u32
                } else {
                    self.average_width as u32
                }
            })
            .sum();
        units as f32 * size_pt / 1000.0
    }
}

#[rustfmt::skip]
static HELVETICA: FontMetricTable = FontMetricTable {
    widths: [
        278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
        556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
        278, 278, 584, 584, 584, 556, 1015,
        667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833,
        722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
        278, 278, 278, 469, 556, 333,
        556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833,
        556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500,
        334, 260, 334, 584,
    ],
    average_width: 556,
};

#[rustfmt::skip]
static HELVETICA_BOLD: FontMetricTable = FontMetricTable {
    widths: [
        278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
        556, 556, 556, 556, 556, 556, 556, 556, 556, 556,
        333, 333, 584, 584, 584, 611, 975,
        722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833,
        722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611,
        333, 278, 333, 584, 556, 333,
        556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889,
        611, 611, 611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500,
        389, 280, 389, 584,
    ],
    average_width: 611,
};

pub fn get_metrics(font: Font) -> &'static FontMetricTable {
    match font {
        Font::Helvetica => &HELVETICA,
        Font::HelveticaBold => &HELVETICA_BOLD,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_measure_empty_is_zero() {
        assert_eq!(get_metrics(Font::Helvetica).measure_str("", 11.0), 0.0);
    }

    #[test]
    fn test_measure_scales_with_size() {
        let m = get_metrics(Font::Helvetica);
        // "a" = 556 units
        assert!((m.measure_str("a", 10.0) - 5.56).abs() < 1e-4);
        assert!((m.measure_str("a", 20.0) - 11.12).abs() < 1e-4);
    }

    #[test]
    fn test_narrow_and_wide_glyphs() {
        let m = get_metrics(Font::Helvetica);
        assert!(m.measure_str("i", 12.0) < m.measure_str("W", 12.0));
        assert!((m.measure_str(" ", 1000.0) - 278.0).abs() < 1e-3);
    }

    #[test]
    fn test_bold_is_not_narrower() {
        let text = "Improved resume summary";
        assert!(
            get_metrics(Font::HelveticaBold).measure_str(text, 11.0)
                >= get_metrics(Font::Helvetica).measure_str(text, 11.0)
        );
    }

    #[test]
    fn test_latin1_falls_back_to_average() {
        let m = get_metrics(Font::Helvetica);
        assert!((m.measure_str("é", 1000.0) - m.average_width as f32).abs() < 1e-3);
    }

    #[test]
    fn test_font_names() {
        assert_eq!(Font::HelveticaBold.base_font(), "Helvetica-Bold");
        assert_eq!(Font::Helvetica.resource_name(), "F1");
    }
}
