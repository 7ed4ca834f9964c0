use glam::{Vec2, Vec3, Vec4};
use lottie_data::model::TextDocument;

use crate::animator::TextStyle;
use crate::assets::TextMeasurer;
use crate::render::{Fill, FillRule, Justification, LineCap, LineJoin, Paint, RenderGlyph, Stroke, Text};

fn document_color(raw: Option<&[f32]>) -> Option<Vec4> {
    match raw? {
        [r, g, b, ..] => Some(Vec4::new(*r, *g, *b, 1.0)),
        _ => None,
    }
}

fn is_line_break(c: char) -> bool {
    c == '\n' || c == '\r' || c == '\u{3}'
}

/// Lays out `text` with the document's font settings, then applies the
/// animator style to the glyphs its range covers.
pub(crate) fn layout_text(
    doc: &TextDocument,
    text: &str,
    style: Option<&TextStyle>,
    measurer: &dyn TextMeasurer,
) -> Text {
    let fill_color = document_color(Some(doc.fc.as_slice())).unwrap_or(Vec4::new(0.0, 0.0, 0.0, 1.0));
    let stroke_color = document_color(doc.sc.as_deref());

    let chars: Vec<char> = text.chars().collect();
    let count = chars.iter().filter(|c| !is_line_break(**c)).count();
    let mut glyphs: Vec<RenderGlyph> = chars
        .iter()
        .map(|&character| RenderGlyph {
            character,
            pos: Vec3::ZERO,
            scale: Vec3::ONE,
            rotation: 0.0,
            skew: 0.0,
            skew_axis: 0.0,
            alpha: 1.0,
            fill: Some(Fill { paint: Paint::Solid(fill_color), opacity: 1.0, rule: FillRule::NonZero }),
            stroke: stroke_color.map(|color| Stroke {
                paint: Paint::Solid(color),
                width: doc.sw.unwrap_or(1.0),
                opacity: 1.0,
                cap: LineCap::Round,
                join: LineJoin::Round,
                miter_limit: 4.0,
                dash: None,
            }),
        })
        .collect();

    // Coverage of each glyph by the animator range; line breaks take none.
    let mut factors = vec![0.0; glyphs.len()];
    if let Some(style) = style {
        let mut index = 0;
        for (glyph, factor) in glyphs.iter().zip(factors.iter_mut()) {
            if !is_line_break(glyph.character) {
                *factor = style.range.factor(index, count);
                index += 1;
            }
        }
    }

    let extra_tracking: Vec<f32> = factors
        .iter()
        .map(|f| style.and_then(|s| s.tracking).unwrap_or(0.0) * f)
        .collect();
    let advance = |i: usize, c: char| {
        let width = measurer.measure(&c.to_string(), &doc.f, doc.s);
        width + (doc.tr + extra_tracking[i]) * doc.s / 1000.0
    };

    match doc.sz.map(Vec2::from) {
        Some(size) => {
            let origin = doc.ps.map(Vec2::from).unwrap_or(Vec2::ZERO);
            let lines = wrap_lines(&chars, size.x, &advance);
            place_lines(&mut glyphs, &lines, &advance, doc, |width| match Justification::from_raw(doc.j) {
                Justification::Right => origin.x + size.x - width,
                Justification::Center => origin.x + (size.x - width) / 2.0,
                Justification::Left => origin.x,
            }, origin.y);
        }
        None => {
            let lines = split_lines(&chars);
            place_lines(&mut glyphs, &lines, &advance, doc, |width| match Justification::from_raw(doc.j) {
                Justification::Right => -width,
                Justification::Center => -width / 2.0,
                Justification::Left => 0.0,
            }, 0.0);
        }
    }

    if let Some(style) = style {
        for (glyph, &factor) in glyphs.iter_mut().zip(&factors) {
            if factor > 0.0 {
                apply_style(glyph, style, factor);
            }
        }
    }

    Text {
        glyphs,
        font_family: doc.f.clone(),
        size: doc.s,
        justify: Justification::from_raw(doc.j),
        tracking: doc.tr,
        line_height: doc.lh,
    }
}

/// Point text: lines end only at explicit breaks.
fn split_lines(chars: &[char]) -> Vec<Vec<usize>> {
    let mut lines = vec![Vec::new()];
    for (i, &c) in chars.iter().enumerate() {
        if is_line_break(c) {
            lines.push(Vec::new());
        } else if let Some(line) = lines.last_mut() {
            line.push(i);
        }
    }
    lines
}

/// Box text: words move to the next line when they overflow `box_width`.
fn wrap_lines(chars: &[char], box_width: f32, advance: &dyn Fn(usize, char) -> f32) -> Vec<Vec<usize>> {
    let mut lines = Vec::new();
    let mut line: Vec<usize> = Vec::new();
    let mut line_width = 0.0;
    let mut i = 0;
    while i < chars.len() {
        let start = i;
        let mut word_width = 0.0;
        let mut breaks_line = false;
        while i < chars.len() {
            let c = chars[i];
            i += 1;
            if is_line_break(c) {
                breaks_line = true;
                break;
            }
            word_width += advance(i - 1, c);
            if c == ' ' {
                break;
            }
        }
        let word = (start..i).filter(|&k| !is_line_break(chars[k]));
        if !line.is_empty() && line_width + word_width > box_width {
            lines.push(std::mem::take(&mut line));
            line_width = 0.0;
        }
        line.extend(word);
        line_width += word_width;
        if breaks_line {
            lines.push(std::mem::take(&mut line));
            line_width = 0.0;
        }
    }
    if !line.is_empty() || lines.is_empty() {
        lines.push(line);
    }
    lines
}

fn place_lines(
    glyphs: &mut [RenderGlyph],
    lines: &[Vec<usize>],
    advance: &dyn Fn(usize, char) -> f32,
    doc: &TextDocument,
    line_start: impl Fn(f32) -> f32,
    top: f32,
) {
    let mut y = top;
    for line in lines {
        let advances: Vec<f32> = line.iter().map(|&i| advance(i, glyphs[i].character)).collect();
        let mut x = line_start(advances.iter().sum());
        for (&i, step) in line.iter().zip(&advances) {
            glyphs[i].pos += Vec3::new(x, y, 0.0);
            x += step;
        }
        y += doc.lh;
    }
}

fn apply_style(glyph: &mut RenderGlyph, style: &TextStyle, factor: f32) {
    let anchor = style.anchor.unwrap_or(Vec3::ZERO);
    if let Some(position) = style.position {
        glyph.pos += position * factor;
    }
    glyph.pos -= anchor * factor;
    if let Some(scale) = style.scale {
        glyph.scale *= Vec3::ONE + (scale * 0.01 - Vec3::ONE) * factor;
    }
    if let Some(rotation) = style.rotation {
        glyph.rotation += rotation.to_radians() * factor;
    }
    if let Some(skew) = style.skew {
        glyph.skew += skew * factor;
    }
    if let Some(axis) = style.skew_axis {
        glyph.skew_axis = axis;
    }
    if let Some(opacity) = style.opacity {
        glyph.alpha *= 1.0 + (opacity * 0.01 - 1.0) * factor;
    }
    if let (Some(target), Some(Fill { paint: Paint::Solid(color), .. })) = (style.fill_color, glyph.fill.as_mut()) {
        *color = color.lerp(target, factor);
    }
    if let Some(stroke) = glyph.stroke.as_mut() {
        if let (Some(target), Paint::Solid(color)) = (style.stroke_color, &mut stroke.paint) {
            *color = color.lerp(target, factor);
        }
        if let Some(width) = style.stroke_width {
            stroke.width += (width - stroke.width) * factor;
        }
    }
}
