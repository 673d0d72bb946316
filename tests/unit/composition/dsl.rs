use super::*;

#[test]
fn builder_produces_valid_section() {
    let section = SectionBuilder::new("hero")
        .on_mount()
        .parallax("hero-bg", 0.5)
        .item(mount_item("hero-title", AnimationParams::fade_up(0.0)))
        .build()
        .unwrap();
    assert_eq!(section.trigger, RevealTrigger::OnMount);
    assert_eq!(section.parallax.unwrap().speed_factor.get(), 0.5);
    assert_eq!(section.items.len(), 1);
}

#[test]
fn builder_rejects_bad_speed_and_threshold() {
    assert!(SectionBuilder::new("a").parallax("bg", 2.0).build().is_err());
    assert!(SectionBuilder::new("a").threshold(0.0).build().is_err());
    assert!(SectionBuilder::new(" ").build().is_err());
}

#[test]
fn staggered_items_offset_delays() {
    let items = staggered_items(["a", "b", "c"], AnimationParams::fade_up(0.0), 0.2);
    let delays: Vec<f64> = items.iter().map(|i| i.entrance.delay_s).collect();
    assert_eq!(delays[0], 0.0);
    assert!((delays[1] - 0.2).abs() < 1e-12);
    assert!((delays[2] - 0.4).abs() < 1e-12);
}

#[test]
fn page_builder_validates_unique_ids() {
    let a = SectionBuilder::new("same").build().unwrap();
    let b = SectionBuilder::new("same").build().unwrap();
    assert!(PageBuilder::new().section(a).section(b).build().is_err());
}

#[test]
fn page_builder_sets_config() {
    let page = PageBuilder::new()
        .coalesce(CoalescePolicy::PerAnimationFrame)
        .default_threshold(0.3)
        .unwrap()
        .section(SectionBuilder::new("about").build().unwrap())
        .build()
        .unwrap();
    assert_eq!(page.tracker.coalesce, CoalescePolicy::PerAnimationFrame);
    assert_eq!(page.reveal.default_threshold.get(), 0.3);
}
