use storefront_core::{
    LayoutProbe, MemoryNavigator, NavigationBridge, SimulatedLayout, StorefrontConfig,
    WindowEffect, WindowManager,
};

const BLOCK_HEIGHT: f64 = 900.0;

fn categories() -> Vec<String> {
    ["a", "b", "c", "d", "e"]
        .iter()
        .map(ToString::to_string)
        .collect()
}

fn dynamic_config() -> StorefrontConfig {
    StorefrontConfig {
        dynamic_growth: true,
        compact_layout: false,
        ..StorefrontConfig::default()
    }
}

/// Mount every visible block, report it loaded and lay it out.
fn render(manager: &mut WindowManager, layout: &mut SimulatedLayout) {
    let visible = manager.visible_ids().to_vec();
    for id in &visible {
        manager.report_load_state(id, true);
    }
    layout.render(visible.into_iter().map(|id| (id, BLOCK_HEIGHT)));
}

#[test]
fn initial_selection_opens_single_category_window() {
    let manager = WindowManager::new(categories(), 2, dynamic_config());
    assert_eq!(manager.start_idx(), 2);
    assert_eq!(manager.right_offset(), 0);
    assert_eq!(manager.visible_ids(), ["c"]);
}

#[test]
fn scrolling_grows_one_category_at_a_time_until_the_end() {
    let mut manager = WindowManager::new(categories(), 2, dynamic_config());
    let mut layout = SimulatedLayout::new(700.0, 300.0);
    render(&mut manager, &mut layout);

    let mut offsets = vec![manager.right_offset()];
    for _ in 0..6 {
        layout.scroll_to_bottom();
        manager.check_growth(&layout);
        render(&mut manager, &mut layout);
        offsets.push(manager.right_offset());
    }

    assert_eq!(manager.visible_ids(), ["c", "d", "e"]);
    assert_eq!(manager.right_offset(), 2);
    assert_eq!(manager.start_idx(), 2);
    for pair in offsets.windows(2) {
        assert!(pair[1] == pair[0] || pair[1] == pair[0] + 1, "{offsets:?}");
    }
}

#[test]
fn growth_is_frozen_while_a_category_loads() {
    let mut manager = WindowManager::new(categories(), 0, dynamic_config());
    let mut layout = SimulatedLayout::new(700.0, 300.0);
    render(&mut manager, &mut layout);
    layout.scroll_to_bottom();

    assert!(manager.check_growth(&layout));
    manager.report_load_state("b", false);
    layout.render(
        manager
            .visible_ids()
            .iter()
            .map(|id| (id.clone(), BLOCK_HEIGHT)),
    );
    layout.scroll_to_bottom();

    let before = manager.state();
    for _ in 0..3 {
        assert!(!manager.check_growth(&layout));
    }
    assert_eq!(manager.state(), before);
}

#[test]
fn picker_jump_covers_distant_category_in_one_step() {
    let config = StorefrontConfig {
        compact_layout: true,
        ..dynamic_config()
    };
    let mut bridge = NavigationBridge::new(MemoryNavigator::new());
    let mut manager = WindowManager::new(categories(), 0, config);
    let mut layout = SimulatedLayout::new(700.0, 300.0).with_lead_height(120.0);
    render(&mut manager, &mut layout);
    let _ = manager.settle(&layout);

    assert!(bridge.select_category(&mut manager, 4));
    assert_eq!(manager.visible_ids(), ["a", "b", "c", "d", "e"]);
    assert_eq!(bridge.navigator().history(), ["e"]);

    // The jump is rendered but the new blocks are still loading.
    manager.report_load_state("e", false);
    layout.render(
        manager
            .visible_ids()
            .iter()
            .map(|id| (id.clone(), BLOCK_HEIGHT)),
    );
    assert!(manager.needs_settle());
    assert!(manager.settle(&layout).is_empty());
    assert!(manager.pending_scroll());

    render(&mut manager, &mut layout);
    assert!(manager.needs_settle());
    let effects = manager.settle(&layout);
    let target = layout.block_top("e").unwrap() + manager.config().scroll_correction_px;
    assert!(effects.iter().any(|effect| matches!(
        effect,
        WindowEffect::ScrollTo { top, .. } if (top - target).abs() < f64::EPSILON
    )));
    assert!(!manager.pending_scroll());
}

#[test]
fn remeasure_after_settle_feeds_the_picker_highlight() {
    let config = StorefrontConfig {
        dynamic_growth: false,
        compact_layout: true,
        ..StorefrontConfig::default()
    };
    let mut manager = WindowManager::new(categories(), 0, config);
    let mut layout = SimulatedLayout::new(700.0, 300.0);
    render(&mut manager, &mut layout);

    let effects = manager.settle(&layout);
    assert!(matches!(
        effects.as_slice(),
        [WindowEffect::ScheduleRemeasure { .. }]
    ));

    layout.scroll_to(BLOCK_HEIGHT * 2.0 + 10.0);
    manager.remeasure_offsets(&layout);
    let order = manager.category_ids().to_vec();
    let active = manager
        .offsets()
        .active_category(&order, layout.scroll_position());
    assert_eq!(active, Some("c"));
}
