use serde::{de::DeserializeOwned, de::SeqAccess, Deserialize, Deserializer, Serialize};
use std::fmt;

/// Root of a parsed animation document.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LottieJson {
    pub v: Option<String>,
    pub ip: f32,
    pub op: f32,
    pub fr: f32,
    pub w: u32,
    pub h: u32,
    #[serde(default)]
    pub nm: Option<String>,
    pub layers: Vec<Layer>,
    #[serde(default)]
    pub assets: Vec<Asset>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Layer {
    // Common
    #[serde(default)]
    pub ty: u8, // 0 precomp, 1 solid, 2 image, 3 null, 4 shape, 5 text
    #[serde(default)]
    pub ind: Option<u32>,
    #[serde(default)]
    pub parent: Option<u32>,
    #[serde(default)]
    pub nm: Option<String>,
    #[serde(default)]
    pub ip: f32,
    #[serde(default)]
    pub op: f32,
    #[serde(default)]
    pub st: f32,
    #[serde(default = "default_one")]
    pub sr: f32, // Time stretch
    #[serde(default)]
    pub ks: Transform,
    #[serde(default)]
    pub tm: Option<Property<f32>>, // Time remap, in seconds
    #[serde(default)]
    pub ddd: Option<u8>, // 3D Layer Flag (0=2D, 1=3D)
    #[serde(default)]
    pub hd: bool,

    #[serde(default, rename = "masksProperties")]
    pub masks_properties: Option<Vec<MaskProperties>>,
    #[serde(default)]
    pub tt: Option<u8>, // Track matte mode of this layer
    #[serde(default)]
    pub td: Option<u8>, // Marks the layer as a matte source

    // Type specific (flattened manually as optional fields)
    #[serde(default, rename = "refId")]
    pub ref_id: Option<String>, // PreComp, Image
    #[serde(default)]
    pub w: Option<u32>, // PreComp
    #[serde(default)]
    pub h: Option<u32>, // PreComp
    #[serde(default, rename = "sc")]
    pub color: Option<String>, // Solid color
    #[serde(default)]
    pub sw: Option<u32>, // Solid width
    #[serde(default)]
    pub sh: Option<u32>, // Solid height
    #[serde(default)]
    pub shapes: Option<Vec<Shape>>, // Shape Layer
    #[serde(default)]
    pub t: Option<TextData>, // Text Layer
}

fn default_one() -> f32 {
    1.0
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct MaskProperties {
    #[serde(default)]
    pub inv: bool,
    #[serde(default)]
    pub mode: Option<String>,
    pub pt: Property<BezierPath>,
    #[serde(default)]
    pub o: Property<f32>,
    #[serde(default)]
    pub x: Property<f32>,
    #[serde(default)]
    pub nm: Option<String>,
}

// Shapes

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(tag = "ty")]
pub enum Shape {
    #[serde(rename = "gr")]
    Group(GroupShape),
    #[serde(rename = "rc")]
    Rect(RectShape),
    #[serde(rename = "el")]
    Ellipse(EllipseShape),
    #[serde(rename = "fl")]
    Fill(FillShape),
    #[serde(rename = "st")]
    Stroke(StrokeShape),
    #[serde(rename = "gf")]
    GradientFill(GradientFillShape),
    #[serde(rename = "gs")]
    GradientStroke(GradientStrokeShape),
    #[serde(rename = "tr")]
    Transform(TransformShape),
    #[serde(rename = "sh")]
    Path(PathShape),
    #[serde(rename = "tm")]
    Trim(TrimShape),
    #[serde(rename = "sr")]
    Polystar(PolystarShape),
    #[serde(rename = "rp")]
    Repeater(NamedShape),
    #[serde(rename = "rd")]
    RoundCorners(RoundCornersShape),
    #[serde(rename = "mm")]
    MergePaths(NamedShape),
    #[serde(rename = "zz")]
    ZigZag(NamedShape),
    #[serde(rename = "pb")]
    PuckerBloat(NamedShape),
    #[serde(rename = "tw")]
    Twist(NamedShape),
    #[serde(rename = "op")]
    OffsetPath(NamedShape),
    #[serde(rename = "wgl")]
    WigglePath(NamedShape),
    #[serde(other)]
    Unknown,
}

impl Shape {
    /// Short type tag as it appears in the document.
    pub fn type_tag(&self) -> &'static str {
        match self {
            Shape::Group(_) => "gr",
            Shape::Rect(_) => "rc",
            Shape::Ellipse(_) => "el",
            Shape::Fill(_) => "fl",
            Shape::Stroke(_) => "st",
            Shape::GradientFill(_) => "gf",
            Shape::GradientStroke(_) => "gs",
            Shape::Transform(_) => "tr",
            Shape::Path(_) => "sh",
            Shape::Trim(_) => "tm",
            Shape::Polystar(_) => "sr",
            Shape::Repeater(_) => "rp",
            Shape::RoundCorners(_) => "rd",
            Shape::MergePaths(_) => "mm",
            Shape::ZigZag(_) => "zz",
            Shape::PuckerBloat(_) => "pb",
            Shape::Twist(_) => "tw",
            Shape::OffsetPath(_) => "op",
            Shape::WigglePath(_) => "wgl",
            Shape::Unknown => "unknown",
        }
    }
}

/// Shape items that are recognized but carry no evaluated properties.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct NamedShape {
    #[serde(default)]
    pub nm: Option<String>,
    #[serde(default)]
    pub hd: bool,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PolystarShape {
    #[serde(default)]
    pub nm: Option<String>,
    #[serde(default)]
    pub hd: bool,
    #[serde(default)]
    pub d: Option<u8>,
    pub p: PositionProperty,
    pub or: Property<f32>,
    #[serde(default)]
    pub os: Property<f32>,
    #[serde(default)]
    pub r: Property<f32>,
    pub pt: Property<f32>,
    #[serde(default)]
    pub sy: u8, // 1 star, 2 polygon
    #[serde(default)]
    pub ir: Option<Property<f32>>,
    #[serde(default)]
    pub is: Option<Property<f32>>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RoundCornersShape {
    #[serde(default)]
    pub nm: Option<String>,
    #[serde(default)]
    pub hd: bool,
    pub r: Property<f32>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct GroupShape {
    #[serde(default)]
    pub nm: Option<String>,
    #[serde(default)]
    pub hd: bool,
    #[serde(default)]
    pub it: Vec<Shape>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct RectShape {
    #[serde(default)]
    pub nm: Option<String>,
    #[serde(default)]
    pub hd: bool,
    #[serde(default)]
    pub d: Option<u8>, // 3 = counter-clockwise
    pub s: Property<Vec2>,
    pub p: Property<Vec2>,
    #[serde(default)]
    pub r: Property<f32>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct EllipseShape {
    #[serde(default)]
    pub nm: Option<String>,
    #[serde(default)]
    pub hd: bool,
    #[serde(default)]
    pub d: Option<u8>,
    pub s: Property<Vec2>,
    pub p: Property<Vec2>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct FillShape {
    #[serde(default)]
    pub nm: Option<String>,
    #[serde(default)]
    pub hd: bool,
    pub c: Property<Rgba>,
    #[serde(default)]
    pub o: Property<f32>,
    #[serde(default)]
    pub r: Option<u8>, // 1 non-zero, 2 even-odd
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct StrokeShape {
    #[serde(default)]
    pub nm: Option<String>,
    #[serde(default)]
    pub hd: bool,
    pub c: Property<Rgba>,
    pub w: Property<f32>,
    #[serde(default)]
    pub o: Property<f32>,
    #[serde(default)]
    pub lc: u8,
    #[serde(default)]
    pub lj: u8,
    #[serde(default)]
    pub ml: Option<f32>,
    #[serde(default)]
    pub d: Vec<DashProperty>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct DashProperty {
    #[serde(default)]
    pub n: Option<String>, // "d" dash, "g" gap, "o" offset
    pub v: Property<f32>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct GradientFillShape {
    #[serde(default)]
    pub nm: Option<String>,
    #[serde(default)]
    pub hd: bool,
    #[serde(default)]
    pub o: Property<f32>,
    pub s: Property<Vec2>,
    pub e: Property<Vec2>,
    #[serde(default = "default_gradient_type")]
    pub t: u8, // 1 linear, 2 radial
    pub g: GradientColors,
    #[serde(default)]
    pub h: Option<Property<f32>>, // Highlight length
    #[serde(default)]
    pub a: Option<Property<f32>>, // Highlight angle
    #[serde(default)]
    pub r: Option<u8>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct GradientStrokeShape {
    #[serde(default)]
    pub nm: Option<String>,
    #[serde(default)]
    pub hd: bool,
    #[serde(default)]
    pub o: Property<f32>,
    pub w: Property<f32>,
    pub s: Property<Vec2>,
    pub e: Property<Vec2>,
    #[serde(default = "default_gradient_type")]
    pub t: u8,
    pub g: GradientColors,
    #[serde(default)]
    pub h: Option<Property<f32>>,
    #[serde(default)]
    pub a: Option<Property<f32>>,
    #[serde(default)]
    pub lc: u8,
    #[serde(default)]
    pub lj: u8,
    #[serde(default)]
    pub ml: Option<f32>,
    #[serde(default)]
    pub d: Vec<DashProperty>,
}

fn default_gradient_type() -> u8 {
    1
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct GradientColors {
    pub p: u32,
    pub k: Property<Vec<f32>>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PathShape {
    #[serde(default)]
    pub nm: Option<String>,
    #[serde(default)]
    pub hd: bool,
    pub ks: Property<BezierPath>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TrimShape {
    #[serde(default)]
    pub nm: Option<String>,
    #[serde(default)]
    pub hd: bool,
    pub s: Property<f32>,
    pub e: Property<f32>,
    #[serde(default)]
    pub o: Property<f32>,
    #[serde(default = "default_trim_mode")]
    pub m: u8, // 1 simultaneously, 2 individually
}

fn default_trim_mode() -> u8 {
    1
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TransformShape {
    #[serde(default)]
    pub nm: Option<String>,
    #[serde(flatten)]
    pub t: Transform,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Transform {
    #[serde(default)]
    pub a: Property<Vec3DefaultZero>, // Anchor: Vec3, default z=0
    #[serde(default)]
    pub p: PositionProperty,          // Position: Vec3, default z=0
    #[serde(default)]
    pub s: Property<Vec3Scale>,       // Scale: Vec3, default 100%
    #[serde(default, alias = "r")]
    pub rz: Property<f32>,            // Rotation Z
    #[serde(default)]
    pub rx: Option<Property<f32>>,    // Rotation X
    #[serde(default)]
    pub ry: Option<Property<f32>>,    // Rotation Y
    #[serde(default)]
    pub or: Option<Property<Vec3DefaultZero>>, // Orientation
    #[serde(default)]
    pub o: Property<f32>,             // Opacity, default 100
    #[serde(default)]
    pub sk: Property<f32>,            // Skew
    #[serde(default)]
    pub sa: Property<f32>,            // Skew axis
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(untagged)]
pub enum PositionProperty {
    Split {
        x: Property<f32>,
        y: Property<f32>,
        #[serde(default)]
        z: Option<Property<f32>>,
    },
    Unified(Property<Vec3DefaultZero>),
}

impl Default for PositionProperty {
    fn default() -> Self {
        PositionProperty::Unified(Property::default())
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Property<T> {
    #[serde(default)]
    pub a: u8,
    #[serde(default)]
    #[serde(bound(deserialize = "T: DeserializeOwned"))]
    pub k: Value<T>,
    #[serde(default)]
    pub ix: Option<u32>,
}

impl<T> Default for Property<T> {
    fn default() -> Self {
        Property {
            a: 0,
            k: Value::Default,
            ix: None,
        }
    }
}

impl<T> Property<T> {
    /// A non-animated property holding `value`.
    pub fn fixed(value: T) -> Self {
        Property {
            a: 0,
            k: Value::Static(value),
            ix: None,
        }
    }

    /// An animated property over `keyframes`.
    pub fn animated(keyframes: Vec<Keyframe<T>>) -> Self {
        Property {
            a: 1,
            k: Value::Animated(keyframes),
            ix: None,
        }
    }
}

#[derive(Debug, Serialize, Clone)]
pub enum Value<T> {
    Default,
    Static(T),
    Animated(Vec<Keyframe<T>>),
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for Value<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let v = serde_json::Value::deserialize(deserializer)?;

        if v.is_null() {
            return Ok(Value::Default);
        }

        // Keyframe lists are arrays of objects carrying a time.
        let looks_keyframed = v
            .as_array()
            .and_then(|arr| arr.first())
            .map(|first| first.get("t").is_some())
            .unwrap_or(false);

        if looks_keyframed {
            if let Ok(keyframes) = serde_json::from_value::<Vec<Keyframe<T>>>(v.clone()) {
                return Ok(Value::Animated(keyframes));
            }
        }

        if let Ok(val) = serde_json::from_value::<T>(v.clone()) {
            return Ok(Value::Static(val));
        }

        if let Ok(vec) = serde_json::from_value::<Vec<T>>(v) {
            if let Some(first) = vec.into_iter().next() {
                return Ok(Value::Static(first));
            }
        }

        Ok(Value::Default)
    }
}

impl<T> Default for Value<T> {
    fn default() -> Self {
        Value::Default
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(bound(deserialize = "T: DeserializeOwned"))]
pub struct Keyframe<T> {
    pub t: f32,
    #[serde(default, deserialize_with = "deserialize_keyframe_value")]
    pub s: Option<T>,
    #[serde(default, deserialize_with = "deserialize_keyframe_value")]
    pub e: Option<T>,
    #[serde(default)]
    pub i: Option<EasingHandle>,
    #[serde(default)]
    pub o: Option<EasingHandle>,
    #[serde(default)]
    pub to: Option<Vec<f32>>,
    #[serde(default)]
    pub ti: Option<Vec<f32>>,
    #[serde(default)]
    pub h: Option<u8>,
}

impl<T> Keyframe<T> {
    /// A keyframe with a start value and no easing handles.
    pub fn at(t: f32, s: T) -> Self {
        Keyframe {
            t,
            s: Some(s),
            e: None,
            i: None,
            o: None,
            to: None,
            ti: None,
            h: None,
        }
    }
}

fn deserialize_keyframe_value<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let v = serde_json::Value::deserialize(deserializer)?;
    if v.is_null() {
        return Ok(None);
    }

    if let Ok(val) = serde_json::from_value(v.clone()) {
        return Ok(Some(val));
    }

    if let Ok(vec) = serde_json::from_value::<Vec<T>>(v) {
        if let Some(first) = vec.into_iter().next() {
            return Ok(Some(first));
        }
    }

    Ok(None)
}

/// Temporal easing handle of a keyframe.
///
/// Documents write these either as `{"x": [..], "y": [..]}` with one entry per
/// dimension, as `{"x": 0.5, "y": 0.5}`, or as a plain `[x, y]` pair. Only the
/// first dimension is kept.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EasingHandle {
    pub x: f32,
    pub y: f32,
}

impl<'de> Deserialize<'de> for EasingHandle {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        fn first(v: Option<&serde_json::Value>) -> Option<f32> {
            match v? {
                serde_json::Value::Number(n) => n.as_f64().map(|f| f as f32),
                serde_json::Value::Array(arr) => arr.first()?.as_f64().map(|f| f as f32),
                _ => None,
            }
        }

        let v = serde_json::Value::deserialize(deserializer)?;
        let handle = match &v {
            serde_json::Value::Object(_) => first(v.get("x")).zip(first(v.get("y"))),
            serde_json::Value::Array(arr) => first(arr.first()).zip(first(arr.get(1))),
            _ => None,
        };
        handle
            .map(|(x, y)| EasingHandle { x, y })
            .ok_or_else(|| serde::de::Error::custom("invalid easing handle"))
    }
}

pub type Vec2 = [f32; 2];
pub type Vec3 = [f32; 3];
pub type Vec4 = [f32; 4];

// Wrapper for Vec3 with Z defaulting to 0.0
#[derive(Debug, Clone, Serialize)]
pub struct Vec3DefaultZero(pub Vec3);

impl Default for Vec3DefaultZero {
    fn default() -> Self {
        Vec3DefaultZero([0.0, 0.0, 0.0])
    }
}

impl<'de> Deserialize<'de> for Vec3DefaultZero {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct Vec3Visitor;
        impl<'de> serde::de::Visitor<'de> for Vec3Visitor {
            type Value = Vec3DefaultZero;
            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a sequence of 2 or 3 floats")
            }
            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: SeqAccess<'de>,
            {
                let x = seq.next_element()?.unwrap_or(0.0);
                let y = seq.next_element()?.unwrap_or(0.0);
                let z = seq.next_element()?.unwrap_or(0.0);
                while seq.next_element::<f32>()?.is_some() {}
                Ok(Vec3DefaultZero([x, y, z]))
            }
        }
        deserializer.deserialize_seq(Vec3Visitor)
    }
}

// Wrapper for Vec3 with Z defaulting to 100.0 (for Scale)
#[derive(Debug, Clone, Serialize)]
pub struct Vec3Scale(pub Vec3);

impl Default for Vec3Scale {
    fn default() -> Self {
        Vec3Scale([100.0, 100.0, 100.0])
    }
}

impl<'de> Deserialize<'de> for Vec3Scale {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct Vec3ScaleVisitor;
        impl<'de> serde::de::Visitor<'de> for Vec3ScaleVisitor {
            type Value = Vec3Scale;
            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a sequence of 2 or 3 floats")
            }
            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: SeqAccess<'de>,
            {
                let x = seq.next_element()?.unwrap_or(0.0);
                let y = seq.next_element()?.unwrap_or(0.0);
                let z = seq.next_element()?.unwrap_or(100.0); // Default to 100%
                while seq.next_element::<f32>()?.is_some() {}
                Ok(Vec3Scale([x, y, z]))
            }
        }
        deserializer.deserialize_seq(Vec3ScaleVisitor)
    }
}

// Color with alpha defaulting to 1.0 when only RGB is given
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rgba(pub Vec4);

impl Default for Rgba {
    fn default() -> Self {
        Rgba([0.0, 0.0, 0.0, 1.0])
    }
}

impl<'de> Deserialize<'de> for Rgba {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct RgbaVisitor;
        impl<'de> serde::de::Visitor<'de> for RgbaVisitor {
            type Value = Rgba;
            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a sequence of 3 or 4 floats")
            }
            fn visit_seq<A>(self, mut seq: A) -> Result<Self::Value, A::Error>
            where
                A: SeqAccess<'de>,
            {
                let r = seq.next_element()?.unwrap_or(0.0);
                let g = seq.next_element()?.unwrap_or(0.0);
                let b = seq.next_element()?.unwrap_or(0.0);
                let a = seq.next_element()?.unwrap_or(1.0);
                while seq.next_element::<f32>()?.is_some() {}
                Ok(Rgba([r, g, b, a]))
            }
        }
        deserializer.deserialize_seq(RgbaVisitor)
    }
}

/// Raw bezier contour. `i` and `o` are tangents relative to their vertex.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct BezierPath {
    #[serde(default)]
    pub c: bool,
    #[serde(default)]
    pub i: Vec<Vec2>,
    #[serde(default)]
    pub o: Vec<Vec2>,
    #[serde(default)]
    pub v: Vec<Vec2>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Asset {
    pub id: String,
    #[serde(default)]
    pub nm: Option<String>,
    #[serde(default)]
    pub layers: Option<Vec<Layer>>,
    #[serde(default)]
    pub w: Option<u32>,
    #[serde(default)]
    pub h: Option<u32>,
    #[serde(default)]
    pub u: Option<String>,
    #[serde(default)]
    pub p: Option<String>,
    #[serde(default)]
    pub e: Option<u8>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TextData {
    pub d: TextDocumentProperty,
    #[serde(default)]
    pub a: Option<Vec<TextAnimatorData>>,
}

/// Text documents are keyframed with `{"t": frame, "s": document}` entries.
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct TextDocumentProperty {
    #[serde(default)]
    pub k: Vec<TextDocumentKeyframe>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TextDocumentKeyframe {
    #[serde(default)]
    pub t: f32,
    pub s: TextDocument,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct TextAnimatorData {
    #[serde(default)]
    pub s: TextSelectorData,
    #[serde(default)]
    pub a: TextStyleData,
    #[serde(default)]
    pub nm: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct TextSelectorData {
    #[serde(default)]
    pub s: Option<Property<f32>>,
    #[serde(default)]
    pub e: Option<Property<f32>>,
    #[serde(default)]
    pub o: Option<Property<f32>>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct TextStyleData {
    #[serde(default)]
    pub a: Option<Property<Vec3DefaultZero>>,
    #[serde(default)]
    pub p: Option<Property<Vec3DefaultZero>>,
    #[serde(default)]
    pub s: Option<Property<Vec3Scale>>,
    #[serde(default)]
    pub sk: Option<Property<f32>>,
    #[serde(default)]
    pub sa: Option<Property<f32>>,
    #[serde(default)]
    pub o: Option<Property<f32>>,
    #[serde(default)]
    pub r: Option<Property<f32>>,
    #[serde(default)]
    pub t: Option<Property<f32>>,
    #[serde(default)]
    pub fc: Option<Property<Rgba>>,
    #[serde(default)]
    pub sc: Option<Property<Rgba>>,
    #[serde(default)]
    pub sw: Option<Property<f32>>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct TextDocument {
    #[serde(default)]
    pub t: String,
    #[serde(default)]
    pub f: String,
    #[serde(default)]
    pub s: f32,
    #[serde(default)]
    pub j: u8,
    #[serde(default)]
    pub tr: f32,
    #[serde(default)]
    pub lh: f32,
    #[serde(default)]
    pub ls: Option<f32>,
    #[serde(default)]
    pub fc: Vec<f32>,
    #[serde(default)]
    pub sc: Option<Vec<f32>>,
    #[serde(default)]
    pub sw: Option<f32>,
    #[serde(default)]
    pub of: Option<bool>,
    #[serde(default)]
    pub sz: Option<Vec2>, // Size [w, h] for Box Text
    #[serde(default)]
    pub ps: Option<Vec2>, // Position [x, y] for Box Text
}
