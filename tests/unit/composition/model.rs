use super::*;

const PAGE: &str = r#"{
  "sections": [
    {
      "id": "hero",
      "entrance": { "duration_s": 1.0 },
      "trigger": "on_mount",
      "parallax": { "layer": "hero-bg", "speed_factor": 0.5 },
      "items": [
        { "id": "hero-title", "trigger": "on_mount",
          "entrance": { "initial_offset": { "x": 0.0, "y": 50.0 }, "duration_s": 0.8 } }
      ]
    },
    {
      "id": "about",
      "content": { "heading": "Welcome" },
      "threshold": 0.25,
      "entrance": { "duration_s": 0.8, "delay_s": 0.2 }
    }
  ]
}"#;

#[test]
fn parses_page_with_defaults() {
    let page = PageSpec::from_json(PAGE).unwrap();
    assert_eq!(page.sections.len(), 2);
    assert_eq!(page.tracker, TrackerConfig::default());
    assert_eq!(page.reveal.default_threshold, Threshold::DEFAULT);

    let hero = &page.sections[0];
    assert_eq!(hero.trigger, RevealTrigger::OnMount);
    assert_eq!(hero.parallax.as_ref().unwrap().speed_factor.get(), 0.5);
    assert_eq!(hero.items[0].entrance.initial_offset.y, 50.0);

    let about = &page.sections[1];
    assert_eq!(about.trigger, RevealTrigger::InView);
    assert_eq!(about.threshold.unwrap().get(), 0.25);
    assert_eq!(about.content["heading"], "Welcome");
}

#[test]
fn rejects_duplicate_element_ids_across_sections_and_items() {
    let json = r#"{ "sections": [
        { "id": "a", "entrance": { "duration_s": 1.0 },
          "items": [ { "id": "b", "entrance": { "duration_s": 1.0 } } ] },
        { "id": "b", "entrance": { "duration_s": 1.0 } }
    ] }"#;
    let err = PageSpec::from_json(json).unwrap_err();
    assert!(err.to_string().contains("duplicate element id 'b'"));
}

#[test]
fn rejects_shared_parallax_layer() {
    let json = r#"{ "sections": [
        { "id": "a", "entrance": { "duration_s": 1.0 },
          "parallax": { "layer": "bg", "speed_factor": 0.5 } },
        { "id": "b", "entrance": { "duration_s": 1.0 },
          "parallax": { "layer": "bg", "speed_factor": 1.0 } }
    ] }"#;
    assert!(PageSpec::from_json(json).is_err());
}

#[test]
fn rejects_out_of_range_values_at_parse_time() {
    let json = r#"{ "sections": [
        { "id": "a", "entrance": { "duration_s": 1.0 },
          "parallax": { "layer": "bg", "speed_factor": 1.5 } }
    ] }"#;
    assert!(matches!(
        PageSpec::from_json(json),
        Err(RevealError::Serde(_))
    ));
}

#[test]
fn entrance_errors_name_the_section() {
    let json = r#"{ "sections": [
        { "id": "about", "entrance": { "duration_s": -1.0 } }
    ] }"#;
    let err = PageSpec::from_json(json).unwrap_err();
    assert!(err.to_string().contains("section 'about'"));
}

#[test]
fn element_ids_lists_root_then_items() {
    let page = PageSpec::from_json(PAGE).unwrap();
    let ids: Vec<&str> = page.sections[0].element_ids().map(|i| i.as_str()).collect();
    assert_eq!(ids, vec!["hero", "hero-title"]);
}
