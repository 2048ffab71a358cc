/// Uniform scale that makes content of `content_w × content_h` fit inside a
/// `container_w × container_h` box without distorting it.
///
/// The smaller of the two axis ratios wins, so the content touches the
/// container on one axis and stays inside it on the other. Content without
/// area cannot be fitted and keeps its natural size (`1.0`).
pub fn fit(container_w: f32, container_h: f32, content_w: f32, content_h: f32) -> f32 {
    if !(content_w > 0.0 && content_h > 0.0) {
        return 1.0;
    }
    let scale_x = container_w / content_w;
    let scale_y = container_h / content_h;
    scale_x.min(scale_y)
}

/// Natural (unscaled) size of a block of text.
pub trait ContentMeasure {
    fn measure(&self, text: &str) -> (f32, f32);
}

/// Fixed-pitch text measurement: every character is `char_width` wide and every
/// line `line_height` tall.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonospaceMetrics {
    pub char_width: f32,
    pub line_height: f32,
}

impl ContentMeasure for MonospaceMetrics {
    fn measure(&self, text: &str) -> (f32, f32) {
        let mut lines = 0usize;
        let mut widest = 0usize;
        for line in text.split('\n') {
            lines += 1;
            widest = widest.max(line.chars().count());
        }
        (
            widest as f32 * self.char_width,
            lines as f32 * self.line_height,
        )
    }
}
