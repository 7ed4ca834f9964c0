use glam::{Vec3, Vec4};
use lottie_data::model as data;

use crate::keyframes::convert::{color_track, optional_track, scale_track, track, vec3_track};
use crate::keyframes::{Keyframe, KeyframeTrack};
use crate::property::{AnyCell, CellValue, PropertyCell, PropertyMap};

/// The text document of a text layer. Documents never blend; a new
/// document replaces the old one at its keyframe.
#[derive(Debug)]
pub struct TextNode {
    document: PropertyCell<data::TextDocument>,
    output: data::TextDocument,
}

impl TextNode {
    pub fn from_data(text: &data::TextData) -> Self {
        let keyframes: Vec<_> = text.d.k.iter().map(|kf| Keyframe::new(kf.s.clone(), kf.t).hold()).collect();
        let track = if keyframes.is_empty() {
            KeyframeTrack::constant(data::TextDocument::default())
        } else {
            KeyframeTrack::new(keyframes)
        };
        Self {
            document: PropertyCell::animated(track, 0),
            output: data::TextDocument::default(),
        }
    }

    pub fn output(&self) -> &data::TextDocument {
        &self.output
    }

    pub(crate) fn rebuild(&mut self) {
        self.output = self.document.value().clone();
    }
}

impl PropertyMap for TextNode {
    fn visit_cells(&mut self, f: &mut dyn FnMut(&'static str, &mut dyn AnyCell)) {
        f("Source Text", &mut self.document);
    }
}

/// Range of glyphs an animator affects, in percent of the glyph count.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextRange {
    pub start: f32,
    pub end: f32,
    pub offset: f32,
}

impl Default for TextRange {
    fn default() -> Self {
        Self { start: 0.0, end: 100.0, offset: 0.0 }
    }
}

impl TextRange {
    /// Coverage of glyph `index` out of `count`, in `0..=1`.
    pub fn factor(&self, index: usize, count: usize) -> f32 {
        if count == 0 {
            return 0.0;
        }
        let scale = count as f32 / 100.0;
        let from = (self.start.min(self.end) + self.offset) * scale;
        let to = (self.start.max(self.end) + self.offset) * scale;
        let idx = index as f32;
        (to.min(idx + 1.0) - from.max(idx)).clamp(0.0, 1.0)
    }
}

/// Values set by a chain of text animators. A field left `None` by an
/// animator is inherited from the one before it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextStyle {
    pub anchor: Option<Vec3>,
    pub position: Option<Vec3>,
    pub scale: Option<Vec3>,
    pub skew: Option<f32>,
    pub skew_axis: Option<f32>,
    pub rotation: Option<f32>,
    pub opacity: Option<f32>,
    pub fill_color: Option<Vec4>,
    pub stroke_color: Option<Vec4>,
    pub stroke_width: Option<f32>,
    pub tracking: Option<f32>,
    pub range: TextRange,
}

impl TextStyle {
    fn inherit(self, parent: &TextStyle) -> TextStyle {
        TextStyle {
            anchor: self.anchor.or(parent.anchor),
            position: self.position.or(parent.position),
            scale: self.scale.or(parent.scale),
            skew: self.skew.or(parent.skew),
            skew_axis: self.skew_axis.or(parent.skew_axis),
            rotation: self.rotation.or(parent.rotation),
            opacity: self.opacity.or(parent.opacity),
            fill_color: self.fill_color.or(parent.fill_color),
            stroke_color: self.stroke_color.or(parent.stroke_color),
            stroke_width: self.stroke_width.or(parent.stroke_width),
            tracking: self.tracking.or(parent.tracking),
            range: self.range,
        }
    }
}

#[derive(Debug)]
pub struct TextAnimatorNode {
    range_start: PropertyCell<f32>,
    range_end: PropertyCell<f32>,
    range_offset: PropertyCell<f32>,
    anchor: Option<PropertyCell<Vec3>>,
    position: Option<PropertyCell<Vec3>>,
    scale: Option<PropertyCell<Vec3>>,
    skew: Option<PropertyCell<f32>>,
    skew_axis: Option<PropertyCell<f32>>,
    rotation: Option<PropertyCell<f32>>,
    opacity: Option<PropertyCell<f32>>,
    fill_color: Option<PropertyCell<Vec4>>,
    stroke_color: Option<PropertyCell<Vec4>>,
    stroke_width: Option<PropertyCell<f32>>,
    tracking: Option<PropertyCell<f32>>,
    output: TextStyle,
}

fn scalar(p: &Option<data::Property<f32>>, n: u32) -> Option<PropertyCell<f32>> {
    p.as_ref().map(|p| PropertyCell::animated(track(p, 0.0, |v| *v), n))
}

impl TextAnimatorNode {
    pub fn from_data(animator: &data::TextAnimatorData, n: u32) -> Self {
        let style = &animator.a;
        let selector = &animator.s;
        Self {
            range_start: PropertyCell::animated(optional_track(selector.s.as_ref(), 0.0, |v| *v), n),
            range_end: PropertyCell::animated(optional_track(selector.e.as_ref(), 100.0, |v| *v), n),
            range_offset: PropertyCell::animated(optional_track(selector.o.as_ref(), 0.0, |v| *v), n),
            anchor: style.a.as_ref().map(|p| PropertyCell::animated(vec3_track(p, Vec3::ZERO), n)),
            position: style.p.as_ref().map(|p| PropertyCell::animated(vec3_track(p, Vec3::ZERO), n)),
            scale: style.s.as_ref().map(|p| PropertyCell::animated(scale_track(p), n)),
            skew: scalar(&style.sk, n),
            skew_axis: scalar(&style.sa, n),
            rotation: scalar(&style.r, n),
            opacity: scalar(&style.o, n),
            fill_color: style.fc.as_ref().map(|p| PropertyCell::animated(color_track(p), n)),
            stroke_color: style.sc.as_ref().map(|p| PropertyCell::animated(color_track(p), n)),
            stroke_width: scalar(&style.sw, n),
            tracking: scalar(&style.t, n),
            output: TextStyle::default(),
        }
    }

    pub fn output(&self) -> &TextStyle {
        &self.output
    }

    pub(crate) fn rebuild(&mut self, parent: Option<&TextStyle>) {
        fn get<T: CellValue + Copy>(cell: &Option<PropertyCell<T>>) -> Option<T> {
            cell.as_ref().map(|c| *c.value())
        }

        let own = TextStyle {
            anchor: get(&self.anchor),
            position: get(&self.position),
            scale: get(&self.scale),
            skew: get(&self.skew),
            skew_axis: get(&self.skew_axis),
            rotation: get(&self.rotation),
            opacity: get(&self.opacity),
            fill_color: get(&self.fill_color),
            stroke_color: get(&self.stroke_color),
            stroke_width: get(&self.stroke_width),
            tracking: get(&self.tracking),
            range: TextRange {
                start: *self.range_start.value(),
                end: *self.range_end.value(),
                offset: *self.range_offset.value(),
            },
        };
        self.output = match parent {
            Some(parent) => own.inherit(parent),
            None => own,
        };
    }
}

impl PropertyMap for TextAnimatorNode {
    fn visit_cells(&mut self, f: &mut dyn FnMut(&'static str, &mut dyn AnyCell)) {
        f("Start", &mut self.range_start);
        f("End", &mut self.range_end);
        f("Offset", &mut self.range_offset);
        if let Some(cell) = &mut self.anchor {
            f("Anchor Point", cell);
        }
        if let Some(cell) = &mut self.position {
            f("Position", cell);
        }
        if let Some(cell) = &mut self.scale {
            f("Scale", cell);
        }
        if let Some(cell) = &mut self.skew {
            f("Skew", cell);
        }
        if let Some(cell) = &mut self.skew_axis {
            f("Skew Axis", cell);
        }
        if let Some(cell) = &mut self.rotation {
            f("Rotation", cell);
        }
        if let Some(cell) = &mut self.opacity {
            f("Opacity", cell);
        }
        if let Some(cell) = &mut self.fill_color {
            f("Fill Color", cell);
        }
        if let Some(cell) = &mut self.stroke_color {
            f("Stroke Color", cell);
        }
        if let Some(cell) = &mut self.stroke_width {
            f("Stroke Width", cell);
        }
        if let Some(cell) = &mut self.tracking {
            f("Tracking", cell);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lottie_data::model::{Property, Rgba, TextAnimatorData, TextStyleData};

    fn animator(style: TextStyleData) -> TextAnimatorNode {
        let mut node = TextAnimatorNode::from_data(&TextAnimatorData { a: style, ..Default::default() }, 10);
        node.update_all(0.0);
        node
    }

    #[test]
    fn later_animator_overrides_and_inherits() {
        let mut first = animator(TextStyleData {
            fc: Some(Property::fixed(Rgba([1.0, 0.0, 0.0, 1.0]))),
            t: Some(Property::fixed(4.0)),
            ..Default::default()
        });
        first.rebuild(None);

        let mut second = animator(TextStyleData {
            fc: Some(Property::fixed(Rgba([0.0, 0.0, 1.0, 1.0]))),
            ..Default::default()
        });
        second.rebuild(Some(first.output()));

        assert_eq!(second.output().fill_color, Some(Vec4::new(0.0, 0.0, 1.0, 1.0)));
        assert_eq!(second.output().tracking, Some(4.0));
        assert_eq!(second.output().opacity, None);
    }

    #[test]
    fn range_factor_covers_partial_glyphs() {
        let range = TextRange { start: 0.0, end: 50.0, offset: 0.0 };
        assert_eq!(range.factor(0, 5), 1.0);
        assert!((range.factor(2, 5) - 0.5).abs() < 1e-6);
        assert_eq!(range.factor(3, 5), 0.0);
    }

    #[test]
    fn document_snaps_between_keyframes() {
        let mut first = data::TextDocument::default();
        first.t = "one".into();
        let mut second = first.clone();
        second.t = "two".into();
        let text = data::TextData {
            d: data::TextDocumentProperty {
                k: vec![
                    data::TextDocumentKeyframe { t: 0.0, s: first },
                    data::TextDocumentKeyframe { t: 10.0, s: second },
                ],
            },
            a: None,
        };
        let mut node = TextNode::from_data(&text);
        node.update_all(9.0);
        node.rebuild();
        assert_eq!(node.output().t, "one");
        node.update_all(10.0);
        node.rebuild();
        assert_eq!(node.output().t, "two");
    }
}
