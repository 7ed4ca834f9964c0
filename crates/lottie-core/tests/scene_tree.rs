use glam::{Vec3, Vec4};
use kurbo::Rect;
use lottie_core::{Animation, EngineConfig, LottieError, NodeContent, Paint, Providers, RenderNode};
use serde_json::{json, Value};

fn document(layers: Value, assets: Value) -> Value {
    json!({ "v": "5.7.0", "ip": 0, "op": 60, "fr": 30, "w": 200, "h": 200, "layers": layers, "assets": assets })
}

fn try_build(doc: Value, config: EngineConfig) -> Result<Animation, LottieError> {
    Animation::new(&serde_json::from_value(doc).unwrap(), config, Providers::default())
}

fn build(doc: Value) -> Animation {
    try_build(doc, EngineConfig::default()).unwrap()
}

fn static_value(k: Value) -> Value {
    json!({ "a": 0, "k": k })
}

fn rect_items() -> Value {
    json!([
        { "ty": "rc", "s": static_value(json!([20, 10])), "p": static_value(json!([0, 0])) },
        { "ty": "fl", "c": static_value(json!([1, 0, 0])), "o": static_value(json!(100)) }
    ])
}

fn shape_layer(name: &str, ind: u32, extra: Value) -> Value {
    let mut layer = json!({ "ty": 4, "nm": name, "ind": ind, "ip": 0, "op": 60, "ks": {}, "shapes": rect_items() });
    if let (Some(layer), Some(extra)) = (layer.as_object_mut(), extra.as_object()) {
        for (key, value) in extra {
            layer.insert(key.clone(), value.clone());
        }
    }
    layer
}

fn shape(node: &RenderNode) -> &lottie_core::Shape {
    match &node.content {
        Some(NodeContent::Shape(shape)) => shape,
        other => panic!("expected shape content, got {other:?}"),
    }
}

fn close(a: Rect, b: Rect) -> bool {
    [a.x0 - b.x0, a.y0 - b.y0, a.x1 - b.x1, a.y1 - b.y1].iter().all(|d| d.abs() < 0.1)
}

#[test]
fn shape_layer_emits_filled_rectangle() {
    let layer = shape_layer("Box", 1, json!({ "ks": { "p": static_value(json!([50, 50])) } }));
    let mut animation = build(document(json!([layer]), json!([])));
    let tree = animation.render(0.0);

    assert_eq!((tree.width, tree.height), (200.0, 200.0));
    assert_eq!(tree.root.subnodes.len(), 1);
    let layer = tree.find("Box").unwrap();
    assert_eq!(layer.transform.w_axis.truncate(), Vec3::new(50.0, 50.0, 0.0));
    assert_eq!(layer.subnodes.len(), 1);

    let draw = &layer.subnodes[0];
    let fill = shape(draw).fill.as_ref().unwrap();
    assert_eq!(fill.paint, Paint::Solid(Vec4::new(1.0, 0.0, 0.0, 1.0)));
    assert!(close(draw.bounds, Rect::new(-10.0, -5.0, 10.0, 5.0)));
    assert!(close(layer.bounds, draw.bounds));
}

#[test]
fn shape_draws_are_named_after_their_group() {
    let shapes = json!([
        {
            "ty": "gr", "nm": "Wheel",
            "it": [
                { "ty": "el", "s": static_value(json!([10, 10])), "p": static_value(json!([0, 0])) },
                { "ty": "fl", "c": static_value(json!([0, 0, 1])) },
                { "ty": "tr" }
            ]
        },
        {
            "ty": "gr", "nm": "Frame",
            "it": [
                { "ty": "rc", "s": static_value(json!([30, 30])), "p": static_value(json!([0, 0])) },
                { "ty": "st", "c": static_value(json!([0, 0, 0])), "w": static_value(json!(2)) },
                { "ty": "tr" }
            ]
        },
        { "ty": "rc", "s": static_value(json!([40, 40])), "p": static_value(json!([0, 0])) },
        { "ty": "fl", "c": static_value(json!([1, 1, 1])) }
    ]);
    let layer = shape_layer("Bike", 1, json!({ "shapes": shapes }));
    let mut animation = build(document(json!([layer]), json!([])));
    let tree = animation.render(0.0);

    let names: Vec<_> = tree.find("Bike").unwrap().subnodes.iter().map(|n| n.name.as_deref()).collect();
    assert_eq!(names, [None, Some("Frame"), Some("Wheel")]);
    assert!(shape(tree.find("Frame").unwrap()).stroke.is_some());
}

#[test]
fn layers_draw_bottom_first_and_hide_outside_their_range() {
    let top = shape_layer("Top", 1, json!({ "ip": 10, "op": 20 }));
    let bottom = shape_layer("Bottom", 2, json!({}));
    let mut animation = build(document(json!([top, bottom]), json!([])));

    let tree = animation.render(5.0);
    let names: Vec<_> = tree.root.subnodes.iter().map(|n| n.name.clone().unwrap()).collect();
    assert_eq!(names, ["Bottom", "Top"]);
    assert!(tree.find("Top").unwrap().is_hidden);

    let tree = animation.render(15.0);
    assert!(!tree.find("Top").unwrap().is_hidden);
    let tree = animation.render(20.0);
    assert!(tree.find("Top").unwrap().is_hidden);
}

#[test]
fn animated_opacity_and_parenting() {
    let opacity = json!({ "a": 1, "k": [ { "t": 0, "s": [0] }, { "t": 10, "s": [100] } ] });
    let parent = shape_layer("Parent", 1, json!({ "ks": { "p": static_value(json!([50, 50])), "o": opacity } }));
    let child = shape_layer("Child", 2, json!({ "parent": 1, "ks": { "p": static_value(json!([10, 0])) } }));
    let mut animation = build(document(json!([parent, child]), json!([])));

    let tree = animation.render(5.0);
    let parent = tree.find("Parent").unwrap();
    assert!((parent.alpha - 0.5).abs() < 1e-4);
    let child = tree.find("Child").unwrap();
    assert_eq!(child.transform.w_axis.truncate(), Vec3::new(60.0, 50.0, 0.0));
    // Opacity does not flow to children.
    assert_eq!(child.alpha, 1.0);
}

#[test]
fn track_matte_attaches_source_to_target() {
    let matte = shape_layer("Matte", 1, json!({ "td": 1 }));
    let target = shape_layer("Target", 2, json!({ "tt": 2 }));
    let mut animation = build(document(json!([matte, target]), json!([])));

    let tree = animation.render(0.0);
    assert_eq!(tree.root.subnodes.len(), 1);
    let target = &tree.root.subnodes[0];
    assert_eq!(target.name.as_deref(), Some("Target"));
    assert!(target.invert_mask);
    assert_eq!(target.mask.as_ref().and_then(|m| m.name.as_deref()), Some("Matte"));
}

#[test]
fn precomp_children_run_on_their_own_clock() {
    let opacity = json!({ "a": 1, "k": [ { "t": 0, "s": [0] }, { "t": 10, "s": [100] } ] });
    let inner = shape_layer("Inner", 1, json!({ "op": 100, "ks": { "o": opacity } }));
    let assets = json!([{ "id": "comp", "layers": [inner] }]);
    let precomp = json!({ "ty": 0, "nm": "Pre", "refId": "comp", "ip": 0, "op": 60, "st": 10, "w": 100, "h": 80 });
    let mut animation = build(document(json!([precomp]), assets));

    let tree = animation.render(15.0);
    let pre = tree.find("Pre").unwrap();
    assert!(pre.masks_to_bounds);
    assert_eq!(pre.bounds, Rect::new(0.0, 0.0, 100.0, 80.0));
    let inner = tree.find("Inner").unwrap();
    assert!((inner.alpha - 0.5).abs() < 1e-4);
    assert!(animation.keypaths().contains(&"Pre.Inner.Transform.Opacity".to_string()));
}

#[test]
fn time_remap_drives_precomp_frame() {
    let opacity = json!({ "a": 1, "k": [ { "t": 0, "s": [0] }, { "t": 10, "s": [100] } ] });
    let inner = shape_layer("Inner", 1, json!({ "op": 100, "ks": { "o": opacity } }));
    let assets = json!([{ "id": "comp", "layers": [inner] }]);
    // 0.1 s at 30 fps is frame 3, whatever the outer frame.
    let precomp = json!({ "ty": 0, "nm": "Pre", "refId": "comp", "ip": 0, "op": 60, "tm": static_value(json!(0.1)) });
    let mut animation = build(document(json!([precomp]), assets));

    for frame in [0.0, 40.0] {
        let tree = animation.render(frame);
        assert!((tree.find("Inner").unwrap().alpha - 0.3).abs() < 1e-3);
    }
}

#[test]
fn trim_shortens_the_outline() {
    let items = json!([
        { "ty": "rc", "s": static_value(json!([20, 10])), "p": static_value(json!([0, 0])) },
        { "ty": "tm", "s": static_value(json!(0)), "e": static_value(json!(25)), "o": static_value(json!(0)) },
        { "ty": "st", "c": static_value(json!([0, 0, 1])), "w": static_value(json!(2)), "o": static_value(json!(100)) }
    ]);
    let layer = shape_layer("Line", 1, json!({ "shapes": items }));
    let config = EngineConfig { trim_accuracy: 0.01, trim_max_samples: 20, ..EngineConfig::default() };
    let mut animation = try_build(document(json!([layer]), json!([])), config).unwrap();

    let tree = animation.render(0.0);
    let draw = &tree.find("Line").unwrap().subnodes[0];
    assert!(shape(draw).stroke.is_some());
    // A quarter of the 60 long outline: the right edge plus 5 along the
    // bottom, inflated by half the stroke width.
    assert!(close(draw.bounds, Rect::new(4.0, -6.0, 11.0, 6.0)));
}

#[test]
fn solid_and_text_layers() {
    let solid = json!({ "ty": 1, "nm": "Solid", "ip": 0, "op": 60, "sc": "#00ff00", "sw": 100, "sh": 50 });
    let text = json!({
        "ty": 5, "nm": "Title", "ip": 0, "op": 60,
        "t": { "d": { "k": [ { "t": 0, "s": { "t": "Hi", "f": "Sans", "s": 10, "j": 0, "lh": 12, "fc": [1, 1, 1] } } ] } }
    });
    let mut animation = build(document(json!([solid, text]), json!([])));
    let tree = animation.render(0.0);

    let solid = tree.find("Solid").unwrap();
    assert_eq!(solid.subnodes[0].bounds, Rect::new(0.0, 0.0, 100.0, 50.0));
    assert_eq!(shape(&solid.subnodes[0]).fill.as_ref().unwrap().paint, Paint::Solid(Vec4::new(0.0, 1.0, 0.0, 1.0)));

    let Some(NodeContent::Text(text)) = &tree.find("Title").unwrap().content else {
        panic!("expected text content");
    };
    let characters: String = text.glyphs.iter().map(|g| g.character).collect();
    assert_eq!(characters, "Hi");
    assert_eq!(text.font_family, "Sans");
}

#[test]
fn unsupported_items_warn_or_fail() {
    let _ = tracing_subscriber::fmt().with_test_writer().with_env_filter("lottie_core=warn").try_init();
    let items = json!([
        { "ty": "rc", "s": static_value(json!([20, 10])), "p": static_value(json!([0, 0])) },
        { "ty": "rp" },
        { "ty": "rp" },
        { "ty": "fl", "c": static_value(json!([1, 0, 0])) }
    ]);
    let doc = document(json!([shape_layer("Box", 1, json!({ "shapes": items }))]), json!([]));

    let animation = try_build(doc.clone(), EngineConfig::default()).unwrap();
    assert_eq!(animation.unsupported(), ["shape item 'rp'"]);

    let strict = EngineConfig { strict_unsupported: true, ..EngineConfig::default() };
    assert!(matches!(try_build(doc, strict), Err(LottieError::UnsupportedFeature(_))));
}

#[test]
fn broken_documents_are_rejected() {
    let image = json!({ "ty": 2, "nm": "Image", "refId": "missing", "ip": 0, "op": 60 });
    assert!(matches!(
        try_build(document(json!([image]), json!([])), EngineConfig::default()),
        Err(LottieError::MissingAsset(id)) if id == "missing"
    ));

    let a = shape_layer("A", 1, json!({ "parent": 2 }));
    let b = shape_layer("B", 2, json!({ "parent": 1 }));
    assert!(matches!(
        try_build(document(json!([a, b]), json!([])), EngineConfig::default()),
        Err(LottieError::InvalidDocument(_))
    ));

    let precomp = json!({ "ty": 0, "nm": "Pre", "refId": "nowhere", "ip": 0, "op": 60 });
    assert!(matches!(
        try_build(document(json!([precomp]), json!([])), EngineConfig::default()),
        Err(LottieError::InvalidDocument(_))
    ));
}
