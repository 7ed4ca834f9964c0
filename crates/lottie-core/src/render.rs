use glam::{Mat4, Vec2, Vec3, Vec4};
use kurbo::{BezPath, Rect};

/// Snapshot of one evaluated frame, consumed by an external renderer.
#[derive(Clone, Debug)]
pub struct RenderTree {
    pub width: f32,
    pub height: f32,
    pub root: RenderNode,
}

impl RenderTree {
    /// Visits every node depth first, parents before children. Mask and
    /// matte nodes are not visited.
    pub fn walk<'a>(&'a self, mut f: impl FnMut(&'a RenderNode, usize)) {
        fn visit<'a>(node: &'a RenderNode, depth: usize, f: &mut impl FnMut(&'a RenderNode, usize)) {
            f(node, depth);
            for child in &node.subnodes {
                visit(child, depth + 1, f);
            }
        }
        visit(&self.root, 0, &mut f);
    }

    pub fn node_count(&self) -> usize {
        let mut count = 0;
        self.walk(|_, _| count += 1);
        count
    }

    /// First node carrying `name`, searched depth first.
    pub fn find(&self, name: &str) -> Option<&RenderNode> {
        let mut found = None;
        self.walk(|node, _| {
            if found.is_none() && node.name.as_deref() == Some(name) {
                found = Some(node);
            }
        });
        found
    }
}

#[derive(Clone, Debug)]
pub struct RenderNode {
    pub name: Option<String>,
    pub bounds: Rect,
    pub transform: Mat4,
    /// Opacity in `0..=1`, not inherited by the renderer from the parent.
    pub alpha: f32,
    pub masks_to_bounds: bool,
    pub is_hidden: bool,
    pub content: Option<NodeContent>,
    pub subnodes: Vec<RenderNode>,
    /// Track matte: the node's rendered alpha clips this node.
    pub mask: Option<Box<RenderNode>>,
    pub invert_mask: bool,
    pub masks: Vec<Mask>,
}

impl RenderNode {
    pub fn container(name: Option<String>) -> Self {
        Self {
            name,
            bounds: Rect::ZERO,
            transform: Mat4::IDENTITY,
            alpha: 1.0,
            masks_to_bounds: false,
            is_hidden: false,
            content: None,
            subnodes: Vec::new(),
            mask: None,
            invert_mask: false,
            masks: Vec::new(),
        }
    }

    pub fn with_content(content: NodeContent) -> Self {
        let mut node = Self::container(None);
        node.content = Some(content);
        node
    }
}

#[derive(Clone, Debug)]
pub enum NodeContent {
    Shape(Shape),
    Text(Text),
    Image(Image),
}

#[derive(Clone, Debug)]
pub struct Shape {
    pub geometry: BezPath,
    pub fill: Option<Fill>,
    pub stroke: Option<Stroke>,
}

#[derive(Clone, Debug)]
pub struct Text {
    pub glyphs: Vec<RenderGlyph>,
    pub font_family: String,
    pub size: f32,
    pub justify: Justification,
    pub tracking: f32,
    pub line_height: f32,
}

#[derive(Clone, Debug)]
pub struct RenderGlyph {
    pub character: char,
    pub pos: Vec3,
    pub scale: Vec3,
    /// Z rotation in radians.
    pub rotation: f32,
    /// Skew angle and skew axis in degrees.
    pub skew: f32,
    pub skew_axis: f32,
    pub alpha: f32,
    pub fill: Option<Fill>,
    pub stroke: Option<Stroke>,
}

#[derive(Clone, Debug)]
pub struct Image {
    /// Encoded image bytes (PNG, JPEG), when the provider resolved them.
    pub data: Option<Vec<u8>>,
    /// Location for the renderer to load when `data` is absent.
    pub path: Option<String>,
    pub width: u32,
    pub height: u32,
    pub id: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Fill {
    pub paint: Paint,
    pub opacity: f32,
    pub rule: FillRule,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Stroke {
    pub paint: Paint,
    pub width: f32,
    pub opacity: f32,
    pub cap: LineCap,
    pub join: LineJoin,
    pub miter_limit: f32,
    pub dash: Option<DashPattern>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Paint {
    Solid(Vec4),
    Gradient(Gradient),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Gradient {
    pub kind: GradientKind,
    pub stops: Vec<GradientStop>,
    pub start: Vec2,
    pub end: Vec2,
    /// Radial only, percent of the start-end distance.
    pub highlight_length: f32,
    /// Radial only, degrees.
    pub highlight_angle: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GradientKind {
    Linear,
    Radial,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GradientStop {
    pub offset: f32,
    pub color: Vec4,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct DashPattern {
    pub array: Vec<f32>,
    pub offset: f32,
}

impl DashPattern {
    /// Pattern ready for stroking: odd arrays are repeated once and the
    /// offset is wrapped into the pattern length. `None` when every dash
    /// length is zero.
    pub fn normalized(&self) -> Option<DashPattern> {
        if self.array.iter().all(|d| *d == 0.0) {
            return None;
        }
        let mut array = self.array.clone();
        if array.len() % 2 != 0 {
            array.extend_from_within(..);
        }
        let total: f32 = array.iter().sum();
        let offset = if total > 0.0 {
            self.offset.rem_euclid(total)
        } else {
            0.0
        };
        Some(DashPattern { array, offset })
    }
}

#[derive(Clone, Debug)]
pub struct Mask {
    pub mode: MaskMode,
    pub geometry: BezPath,
    pub opacity: f32,
    pub expansion: f32,
    pub inverted: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Justification {
    Left,
    Right,
    Center,
}

impl Justification {
    pub fn from_raw(j: u8) -> Self {
        match j {
            1 => Justification::Right,
            2 => Justification::Center,
            _ => Justification::Left,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FillRule {
    NonZero,
    EvenOdd,
}

impl FillRule {
    pub fn from_raw(r: Option<u8>) -> Self {
        match r {
            Some(2) => FillRule::EvenOdd,
            _ => FillRule::NonZero,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LineCap {
    Butt,
    Round,
    Square,
}

impl LineCap {
    pub fn from_raw(lc: u8) -> Self {
        match lc {
            1 => LineCap::Butt,
            3 => LineCap::Square,
            _ => LineCap::Round,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LineJoin {
    Miter,
    Round,
    Bevel,
}

impl LineJoin {
    pub fn from_raw(lj: u8) -> Self {
        match lj {
            1 => LineJoin::Miter,
            3 => LineJoin::Bevel,
            _ => LineJoin::Round,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MaskMode {
    None,
    Add,
    Subtract,
    Intersect,
}

struct ColorStop {
    t: f32,
    rgb: Vec3,
}

struct AlphaStop {
    t: f32,
    a: f32,
}

/// Builds gradient stops from the raw stop array: `color_count` entries of
/// `[t, r, g, b]` optionally followed by `[t, a]` alpha pairs.
pub fn parse_gradient_stops(raw: &[f32], color_count: usize) -> Vec<GradientStop> {
    let color_len = (color_count * 4).min(raw.len());
    let colors: Vec<ColorStop> = raw[..color_len]
        .chunks_exact(4)
        .map(|c| ColorStop { t: c[0], rgb: Vec3::new(c[1], c[2], c[3]) })
        .collect();
    let alphas: Vec<AlphaStop> = raw[color_len..]
        .chunks_exact(2)
        .map(|c| AlphaStop { t: c[0], a: c[1] })
        .collect();

    if alphas.is_empty() {
        return colors
            .iter()
            .map(|c| GradientStop { offset: c.t, color: c.rgb.extend(1.0) })
            .collect();
    }

    let mut offsets: Vec<f32> = colors.iter().map(|c| c.t).chain(alphas.iter().map(|a| a.t)).collect();
    offsets.sort_by(|a, b| a.total_cmp(b));
    offsets.dedup();
    offsets
        .into_iter()
        .map(|t| GradientStop {
            offset: t,
            color: color_at(&colors, t).extend(alpha_at(&alphas, t)),
        })
        .collect()
}

fn color_at(stops: &[ColorStop], t: f32) -> Vec3 {
    let (Some(first), Some(last)) = (stops.first(), stops.last()) else {
        return Vec3::ONE;
    };
    if t <= first.t {
        return first.rgb;
    }
    if t >= last.t {
        return last.rgb;
    }
    for pair in stops.windows(2) {
        let (a, b) = (&pair[0], &pair[1]);
        if t >= a.t && t <= b.t {
            let range = b.t - a.t;
            let ratio = if range == 0.0 { 0.0 } else { (t - a.t) / range };
            return a.rgb.lerp(b.rgb, ratio);
        }
    }
    Vec3::ONE
}

fn alpha_at(stops: &[AlphaStop], t: f32) -> f32 {
    let (Some(first), Some(last)) = (stops.first(), stops.last()) else {
        return 1.0;
    };
    if t <= first.t {
        return first.a;
    }
    if t >= last.t {
        return last.a;
    }
    for pair in stops.windows(2) {
        let (a, b) = (&pair[0], &pair[1]);
        if t >= a.t && t <= b.t {
            let range = b.t - a.t;
            let ratio = if range == 0.0 { 0.0 } else { (t - a.t) / range };
            return a.a + (b.a - a.a) * ratio;
        }
    }
    1.0
}
