//! Fixed-width layout of a presentation snapshot into a display list.
//!
//! All coordinates are logical pixels; the rasterizer multiplies them by the
//! supersampling factor. Text is set in 8×8 cell glyphs scaled by an integer
//! factor, so a line of `n` characters at scale `s` is `8 * s * n` wide.

use std::sync::Arc;

use log::debug;

use crate::model::ImageSource;
use crate::presenter::{
    Snapshot, INGREDIENTS_HEADING, INSTRUCTIONS_HEADING, TIPS_HEADING,
};

pub const GLYPH_CELL: u32 = 8;

const HERO_HEIGHT: u32 = 320;
const PADDING: u32 = 48;
const ASIDE_PADDING: u32 = 16;
const COLUMN_GAP: u32 = 32;
pub(crate) const SHADOW_WIDTH: u32 = 6;

const TITLE_SCALE: u32 = 4;
const HEADING_SCALE: u32 = 3;
const STEP_NUMBER_SCALE: u32 = 4;
const BODY_SCALE: u32 = 2;

pub type Rgb = [u8; 3];

pub const WHITE: Rgb = [255, 255, 255];
pub const PLACEHOLDER: Rgb = [209, 213, 219];
const INK: Rgb = [17, 24, 39];
const BODY: Rgb = [55, 65, 81];
const MUTED: Rgb = [75, 85, 99];
const FAINT: Rgb = [229, 231, 235];
const RULE: Rgb = [209, 213, 219];
const ASIDE: Rgb = [249, 241, 240];
pub(crate) const SHADOW: Rgb = [156, 163, 175];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// A drawing instruction in logical pixels
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Fill { rect: Rect, color: Rgb },
    Text { x: u32, y: u32, scale: u32, color: Rgb, text: String },
    Image {
        rect: Rect,
        source: ImageSource,
        bytes: Option<Arc<[u8]>>,
    },
    /// On-screen page shadow around `rect`
    Shadow { rect: Rect },
}

/// Everything needed to rasterize one laid-out document
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayList {
    pub width: u32,
    pub height: u32,
    pub items: Vec<Primitive>,
}

/// Detached surface a snapshot is laid out on for printing.
///
/// Lives only as long as the render that needs it.
#[derive(Debug)]
pub struct OffscreenContainer {
    display_list: DisplayList,
}

impl OffscreenContainer {
    /// Lay `snapshot` out at `width` with screen decoration stripped.
    pub fn mount(snapshot: &Snapshot, width: u32) -> Self {
        let print = snapshot.clone().for_print();
        let display_list = layout(&print, width);
        debug!(
            "Mounted off-screen container {}x{}",
            display_list.width, display_list.height
        );
        Self { display_list }
    }

    pub fn display_list(&self) -> &DisplayList {
        &self.display_list
    }
}

impl Drop for OffscreenContainer {
    fn drop(&mut self) {
        debug!("Removed off-screen container");
    }
}

fn line_height(scale: u32) -> u32 {
    GLYPH_CELL * scale * 3 / 2
}

fn text_width(text: &str, scale: u32) -> u32 {
    text.chars().count() as u32 * GLYPH_CELL * scale
}

/// Greedy word wrap to at most `max_chars` characters per line.
///
/// Words longer than a line are split. An empty input yields one empty line.
pub fn wrap(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in text.split_whitespace() {
        let mut chars: Vec<char> = word.chars().collect();
        while chars.len() > max_chars {
            if current_len > 0 {
                lines.push(std::mem::take(&mut current));
                current_len = 0;
            }
            let rest = chars.split_off(max_chars);
            lines.push(chars.into_iter().collect());
            chars = rest;
        }

        let len = chars.len();
        if current_len > 0 && current_len + 1 + len > max_chars {
            lines.push(std::mem::take(&mut current));
            current_len = 0;
        }
        if current_len > 0 {
            current.push(' ');
            current_len += 1;
        }
        current.extend(chars);
        current_len += len;
    }

    if current_len > 0 || lines.is_empty() {
        lines.push(current);
    }
    lines
}

struct Column<'a> {
    items: &'a mut Vec<Primitive>,
    x: u32,
    width: u32,
    y: u32,
}

impl Column<'_> {
    fn chars_per_line(&self, scale: u32) -> usize {
        (self.width / (GLYPH_CELL * scale)) as usize
    }

    fn paragraph(&mut self, text: &str, scale: u32, color: Rgb) {
        for line in wrap(text, self.chars_per_line(scale)) {
            if !line.is_empty() {
                self.items.push(Primitive::Text {
                    x: self.x,
                    y: self.y,
                    scale,
                    color,
                    text: line,
                });
            }
            self.y += line_height(scale);
        }
    }

    fn centered(&mut self, text: &str, scale: u32, color: Rgb) {
        for line in wrap(text, self.chars_per_line(scale)) {
            let offset = self.width.saturating_sub(text_width(&line, scale)) / 2;
            self.items.push(Primitive::Text {
                x: self.x + offset,
                y: self.y,
                scale,
                color,
                text: line,
            });
            self.y += line_height(scale);
        }
    }

    fn rule(&mut self, width: u32, thickness: u32) {
        self.items.push(Primitive::Fill {
            rect: Rect {
                x: self.x,
                y: self.y,
                width,
                height: thickness,
            },
            color: RULE,
        });
        self.y += thickness;
    }

    fn gap(&mut self, px: u32) {
        self.y += px;
    }
}

/// Lay the snapshot out at a fixed logical width.
pub fn layout(snapshot: &Snapshot, width: u32) -> DisplayList {
    let mut items = Vec::new();

    items.push(Primitive::Image {
        rect: Rect {
            x: 0,
            y: 0,
            width,
            height: HERO_HEIGHT,
        },
        source: snapshot.hero.clone(),
        bytes: snapshot.hero_bytes.clone(),
    });

    let content_width = width.saturating_sub(2 * PADDING);
    let mut main = Column {
        items: &mut items,
        x: PADDING,
        width: content_width,
        y: HERO_HEIGHT + PADDING,
    };

    // Header
    main.centered(&snapshot.title, TITLE_SCALE, INK);
    main.gap(24);
    main.rule(content_width, 1);
    main.gap(16);
    main.centered(&snapshot.meta, BODY_SCALE, MUTED);
    main.gap(16);
    main.rule(content_width, 1);
    main.gap(40);
    let columns_top = main.y;

    // Ingredients aside, one third of the content width
    let aside_width = content_width * 4 / 12;
    let mut aside_items = Vec::new();
    let mut aside = Column {
        items: &mut aside_items,
        x: PADDING + ASIDE_PADDING,
        width: aside_width.saturating_sub(2 * ASIDE_PADDING),
        y: columns_top + ASIDE_PADDING,
    };
    aside.paragraph(INGREDIENTS_HEADING, HEADING_SCALE, INK);
    aside.gap(8);
    aside.rule(text_width(INGREDIENTS_HEADING, HEADING_SCALE).min(aside.width), 2);
    aside.gap(24);
    for ingredient in &snapshot.ingredients {
        aside.paragraph(ingredient, BODY_SCALE, BODY);
        aside.gap(12);
    }
    let aside_bottom = aside.y + ASIDE_PADDING;

    // Instructions column
    let steps_x = PADDING + aside_width + COLUMN_GAP;
    let steps_width = content_width.saturating_sub(aside_width + COLUMN_GAP);
    let number_width = 3 * GLYPH_CELL * STEP_NUMBER_SCALE / 2;
    let mut step_items = Vec::new();
    let mut steps = Column {
        items: &mut step_items,
        x: steps_x,
        width: steps_width,
        y: columns_top,
    };
    steps.paragraph(INSTRUCTIONS_HEADING, HEADING_SCALE, INK);
    steps.gap(8);
    steps.rule(text_width(INSTRUCTIONS_HEADING, HEADING_SCALE).min(steps_width), 2);
    steps.gap(24);
    let mut steps_bottom = steps.y;
    for step in &snapshot.steps {
        let top = steps_bottom;
        steps.items.push(Primitive::Text {
            x: steps_x,
            y: top,
            scale: STEP_NUMBER_SCALE,
            color: FAINT,
            text: step.number.clone(),
        });
        let mut body = Column {
            items: &mut *steps.items,
            x: steps_x + number_width,
            width: steps_width.saturating_sub(number_width),
            y: top,
        };
        body.paragraph(&step.title, BODY_SCALE, INK);
        body.paragraph(&step.text, BODY_SCALE, BODY);
        let bottom = body.y.max(top + line_height(STEP_NUMBER_SCALE));
        steps_bottom = bottom + 24;
    }

    items.push(Primitive::Fill {
        rect: Rect {
            x: PADDING,
            y: columns_top,
            width: aside_width,
            height: aside_bottom - columns_top,
        },
        color: ASIDE,
    });
    items.extend(aside_items);
    items.extend(step_items);

    // Footer
    let mut footer = Column {
        items: &mut items,
        x: PADDING,
        width: content_width,
        y: aside_bottom.max(steps_bottom) + PADDING,
    };
    footer.rule(content_width, 1);
    footer.gap(32);
    footer.paragraph(TIPS_HEADING, BODY_SCALE + 1, INK);
    footer.gap(8);
    footer.paragraph(&snapshot.tips, BODY_SCALE, MUTED);
    let height = footer.y + PADDING;

    if snapshot.shadow {
        items.push(Primitive::Shadow {
            rect: Rect {
                x: 0,
                y: 0,
                width,
                height,
            },
        });
    }

    DisplayList {
        width,
        height,
        items,
    }
}
