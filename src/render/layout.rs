//! Page layout for the protocol document.
//!
//! Single top-to-bottom pass over the snapshot, no backtracking. A page break
//! happens before a step and before each parameter line once the cursor has
//! passed `MAX_Y`; nothing is ever moved back to an earlier page.

use crate::label;
use crate::render::measure::{TextMeasure, TextStyle};
use crate::session::Snapshot;

/// Cursor bound; past this the next step or parameter starts a new page.
pub const MAX_Y: f64 = 270.0;
pub const TOP_Y: f64 = 20.0;
pub const LINE_HEIGHT: f64 = 6.0;
pub const MAX_WIDTH: f64 = 180.0;
pub const MARGIN_X: f64 = 14.0;
pub const BULLET_X: f64 = 18.0;
pub const CENTER_X: f64 = 105.0;
pub const RULE_END_X: f64 = 196.0;

pub const UNTITLED: &str = "Untitled protocol";

const TITLE: TextStyle = TextStyle::bold(18.0);
const HEADING: TextStyle = TextStyle::bold(14.0);
const BODY: TextStyle = TextStyle::regular(11.0);
const BODY_BOLD: TextStyle = TextStyle::bold(11.0);

const PARAMETER_GAP: f64 = 2.0;
const RULE_GAP: f64 = 10.0;
const RULE_GRAY: u8 = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextBlock {
    pub x: f64,
    pub y: f64,
    pub text: String,
    pub style: TextStyle,
    pub align: Align,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RuleBlock {
    pub x1: f64,
    pub x2: f64,
    pub y: f64,
    pub gray: u8,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Text(TextBlock),
    Rule(RuleBlock),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Page {
    pub blocks: Vec<Block>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub title: String,
    pub pages: Vec<Page>,
}

/// Write cursor over the growing page list.
struct Cursor<'m> {
    measure: &'m dyn TextMeasure,
    pages: Vec<Page>,
    y: f64,
}

impl<'m> Cursor<'m> {
    fn new(measure: &'m dyn TextMeasure) -> Self {
        Self {
            measure,
            pages: vec![Page::default()],
            y: TOP_Y,
        }
    }

    /// The page being written. `new` seeds one and pages are only pushed.
    fn page(&mut self) -> &mut Page {
        let last = self.pages.len() - 1;
        &mut self.pages[last]
    }

    fn break_if_needed(&mut self) {
        if self.y > MAX_Y {
            self.pages.push(Page::default());
            self.y = TOP_Y;
        }
    }

    fn text(&mut self, text: &str, x: f64, style: TextStyle, align: Align) {
        let y = self.y;
        self.page().blocks.push(Block::Text(TextBlock {
            x,
            y,
            text: text.to_string(),
            style,
            align,
        }));
    }

    /// Wrap to `MAX_WIDTH`, one block per line, and move past all of them.
    fn wrapped(&mut self, text: &str, x: f64, style: TextStyle) {
        let lines = self.measure.split_to_width(text, MAX_WIDTH, style);
        for (i, line) in lines.iter().enumerate() {
            let y = self.y + LINE_HEIGHT * i as f64;
            self.page().blocks.push(Block::Text(TextBlock {
                x,
                y,
                text: line.clone(),
                style,
                align: Align::Left,
            }));
        }
        self.y += LINE_HEIGHT * lines.len() as f64;
    }

    fn rule(&mut self) {
        let y = self.y;
        self.page().blocks.push(Block::Rule(RuleBlock {
            x1: MARGIN_X,
            x2: RULE_END_X,
            y,
            gray: RULE_GRAY,
        }));
    }
}

/// Lay out the snapshot. `generated_on` is the already formatted timestamp.
pub fn layout(snapshot: &Snapshot<'_>, generated_on: &str, measure: &dyn TextMeasure) -> Document {
    let title = if snapshot.header.is_empty() {
        UNTITLED
    } else {
        snapshot.header
    };

    let mut cur = Cursor::new(measure);

    cur.text(title, CENTER_X, TITLE, Align::Center);
    cur.y += LINE_HEIGHT * 2.0;

    cur.text(&format!("Generated on: {}", generated_on), MARGIN_X, BODY, Align::Left);
    cur.y += LINE_HEIGHT;
    cur.text(
        &format!("Number of steps: {}", snapshot.steps.len()),
        MARGIN_X,
        BODY,
        Align::Left,
    );
    cur.y += LINE_HEIGHT * 2.0;

    cur.text("Steps", MARGIN_X, HEADING, Align::Left);
    cur.y += LINE_HEIGHT;

    for (index, step) in snapshot.steps.iter().enumerate() {
        cur.break_if_needed();

        let step_title = format!(
            "Step {}: {}",
            index + 1,
            label::operation_label(&step.operation_name)
        );
        cur.wrapped(&step_title, MARGIN_X, BODY_BOLD);

        let category = format!("Category: {}", label::category_label(&step.category));
        cur.wrapped(&category, MARGIN_X, BODY);

        if !step.parameters.is_empty() {
            cur.y += PARAMETER_GAP;
            cur.text("Parameters:", MARGIN_X, BODY, Align::Left);
            cur.y += LINE_HEIGHT;

            for param in &step.parameters {
                cur.break_if_needed();
                let line = format!(
                    "• {}: {}",
                    label::parameter_label(param),
                    label::format_value(param, step.values.get(&param.name))
                );
                cur.wrapped(&line, BULLET_X, BODY);
            }
        }

        cur.y += RULE_GAP;
        cur.rule();
        cur.y += RULE_GAP;
    }

    tracing::debug!(
        steps = snapshot.steps.len(),
        pages = cur.pages.len(),
        "document laid out"
    );

    Document {
        title: title.to_string(),
        pages: cur.pages,
    }
}
