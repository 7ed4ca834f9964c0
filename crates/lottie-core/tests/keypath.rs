use glam::{Vec2, Vec4};
use lottie_core::{Animation, AnyValue, EngineConfig, LottieError, NodeContent, Paint, Providers, ValueKind};
use serde_json::json;

fn animation() -> Animation {
    let doc = json!({
        "v": "5.7.0", "ip": 0, "op": 60, "fr": 30, "w": 100, "h": 100,
        "layers": [{
            "ty": 4, "nm": "Box", "ip": 0, "op": 60, "ks": {},
            "shapes": [{
                "ty": "gr", "nm": "Body",
                "it": [
                    { "ty": "rc", "s": { "a": 0, "k": [20, 10] }, "p": { "a": 0, "k": [0, 0] } },
                    { "ty": "fl", "c": { "a": 0, "k": [1, 0, 0] } },
                    { "ty": "tr", "p": { "a": 0, "k": [0, 0] } }
                ]
            }],
            "masksProperties": [{
                "mode": "a",
                "pt": { "a": 0, "k": { "c": true, "v": [[0, 0], [10, 0], [10, 10]], "i": [[0, 0], [0, 0], [0, 0]], "o": [[0, 0], [0, 0], [0, 0]] } }
            }]
        }]
    });
    Animation::new(&serde_json::from_value(doc).unwrap(), EngineConfig::default(), Providers::default()).unwrap()
}

fn fill_color(animation: &mut Animation) -> Option<Vec4> {
    let tree = animation.scene();
    let layer = tree.find("Box")?;
    match layer.subnodes.first()?.content.as_ref()? {
        NodeContent::Shape(shape) => match &shape.fill.as_ref()?.paint {
            Paint::Solid(color) => Some(*color),
            _ => None,
        },
        _ => None,
    }
}

#[test]
fn lists_properties_by_name() {
    let mut animation = animation();
    let keypaths = animation.keypaths();
    for expected in [
        "Box.Transform.Opacity",
        "Box.Body.Transform.Position",
        "Box.Body.Rectangle 1.Size",
        "Box.Body.Fill 1.Color",
        "Box.Masks.Mask 1.Mask Path",
    ] {
        assert!(keypaths.iter().any(|k| k == expected), "missing {expected} in {keypaths:?}");
    }
}

#[test]
fn override_reaches_the_next_scene() {
    let mut animation = animation();
    animation.update(0.0, false);
    assert_eq!(fill_color(&mut animation), Some(Vec4::new(1.0, 0.0, 0.0, 1.0)));

    let blue = Vec4::new(0.0, 0.0, 1.0, 1.0);
    assert_eq!(animation.set_value("**.Fill 1.Color", AnyValue::Color(blue)).unwrap(), 1);
    assert_eq!(fill_color(&mut animation), Some(blue));
    assert_eq!(animation.value("Box.Body.Fill 1.Color").unwrap()[0].1, AnyValue::Color(blue));
}

#[test]
fn wrong_kind_is_rejected() {
    let mut animation = animation();
    let err = animation.set_value("Box.Body.Rectangle 1.Size", AnyValue::Scalar(3.0)).unwrap_err();
    match err {
        LottieError::TypeMismatch { keypath, expected, found } => {
            assert_eq!(keypath, "Box.Body.Rectangle 1.Size");
            assert_eq!(expected, ValueKind::Vector2);
            assert_eq!(found, ValueKind::Scalar);
        }
        other => panic!("unexpected error {other:?}"),
    }
    assert!(animation.set_value("Box.Body.Rectangle 1.Size", AnyValue::Vector2(Vec2::new(4.0, 4.0))).is_ok());
}

#[test]
fn unknown_keypaths_are_reported() {
    let mut animation = animation();
    assert!(matches!(animation.value("Nope.Opacity"), Err(LottieError::KeypathNotFound(_))));
    assert!(matches!(animation.set_enabled("Box.Nope", false), Err(LottieError::KeypathNotFound(_))));
}

#[test]
fn disabling_nodes_hides_their_output() {
    let mut animation = animation();
    animation.update(0.0, false);

    animation.set_enabled("Box.Body.Fill 1", false).unwrap();
    let tree = animation.scene();
    assert!(tree.find("Box").unwrap().subnodes.is_empty());

    animation.set_enabled("Box.Body.Fill 1", true).unwrap();
    assert!(fill_color(&mut animation).is_some());

    animation.set_enabled("Box.Masks.Mask 1", false).unwrap();
    assert!(animation.scene().find("Box").unwrap().masks.is_empty());

    animation.set_enabled("Box.Transform", false).unwrap();
    assert!(animation.scene().find("Box").unwrap().is_hidden);
}
