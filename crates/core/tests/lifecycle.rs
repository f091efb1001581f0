//! End-to-end lifecycle behavior over the headless host.

use warren::headless::HeadlessHost;
use warren::layout;
use warren::sink::{MemoryHistory, RecordingSink};
use warren::{GroupManager, ManagerConfig, SurfaceEvent};
use warren_protocol::{Bounds, GroupId, Notification};

const HOMEPAGE: &str = "https://home.test/";

fn window() -> Bounds {
    Bounds::new(0, 0, 1200, 800)
}

fn fixture() -> (GroupManager, HeadlessHost, RecordingSink, MemoryHistory) {
    let host = HeadlessHost::new(window());
    let sink = RecordingSink::new();
    let history = MemoryHistory::new();
    let manager = GroupManager::new(
        Box::new(host.clone()),
        Box::new(sink.clone()),
        Box::new(history.clone()),
        ManagerConfig {
            homepage: HOMEPAGE.to_string(),
            window: window(),
        },
    );
    (manager, host, sink, history)
}

fn pump(manager: &mut GroupManager, host: &HeadlessHost) {
    for (surface, event) in host.drain_events() {
        manager.handle_surface_event(surface, event);
    }
}

/// Invariants 1-3: single active selection at both levels, and at most one
/// attached surface, belonging to the active tab of the active group.
fn assert_invariants(manager: &GroupManager, host: &HeadlessHost) {
    let groups = manager.list_groups();
    if !groups.is_empty() {
        assert_eq!(
            groups.iter().filter(|group| group.is_active).count(),
            1,
            "exactly one active group"
        );
    }
    for group in &groups {
        let tabs = manager.list_tabs(group.id);
        if !tabs.is_empty() {
            assert_eq!(
                tabs.iter().filter(|tab| tab.is_active).count(),
                1,
                "exactly one active tab in group {}",
                group.id
            );
        }
    }

    let attached = host.attached();
    assert!(attached.len() <= 1, "at most one attached surface");
    match manager.active_surface() {
        Some(active) => assert_eq!(attached, vec![active]),
        None => assert!(attached.is_empty()),
    }
}

#[test]
fn fresh_group_notifies_group_tab_activation_in_order() {
    let (mut manager, host, sink, _history) = fixture();

    let group = manager.create_group(None).expect("group created");

    let events = sink.take();
    assert_eq!(events.len(), 3, "unexpected notifications: {events:?}");
    assert!(matches!(
        &events[0],
        Notification::GroupCreated { id, name } if *id == group && name == "Group 1"
    ));
    assert!(matches!(&events[1], Notification::TabCreated { url, .. } if url == HOMEPAGE));
    assert!(matches!(&events[2], Notification::TabActivated { .. }));

    assert_eq!(manager.group_count(), 1);
    assert_eq!(manager.list_tabs(group).len(), 1);
    assert_invariants(&manager, &host);
}

#[test]
fn group_names_number_from_list_length() {
    let (mut manager, _host, _sink, _history) = fixture();
    manager.create_group(None);
    manager.create_group(Some("Work"));
    manager.create_group(None);

    let names: Vec<String> = manager
        .list_groups()
        .into_iter()
        .map(|group| group.name)
        .collect();
    assert_eq!(names, vec!["Group 1", "Work", "Group 3"]);
}

#[test]
fn single_selection_holds_across_group_and_tab_churn() {
    let (mut manager, host, _sink, _history) = fixture();

    let g1 = manager.create_group(None).unwrap();
    manager.create_tab(Some("https://a.test/"));
    let g2 = manager.create_group(None).unwrap();
    manager.create_tab(Some("https://b.test/"));
    manager.create_tab(Some("https://c.test/"));
    assert_invariants(&manager, &host);

    manager.set_active_group(g1);
    assert_invariants(&manager, &host);
    assert_eq!(manager.active_group_id(), Some(g1));

    manager.set_active_group(g2);
    let tabs = manager.list_tabs(g2);
    manager.close_tab(g2, tabs.iter().find(|tab| tab.is_active).unwrap().id);
    assert_invariants(&manager, &host);
}

#[test]
fn closing_the_only_tab_self_heals() {
    let (mut manager, host, _sink, _history) = fixture();
    let group = manager.create_group(None).unwrap();
    let only = manager.list_tabs(group)[0].id;

    manager.close_tab(group, only);

    let tabs = manager.list_tabs(group);
    assert_eq!(tabs.len(), 1, "a controller never stays empty");
    assert_ne!(tabs[0].id, only);
    assert!(tabs[0].is_active);
    assert_invariants(&manager, &host);
}

#[test]
fn closing_the_only_group_self_heals() {
    let (mut manager, host, _sink, _history) = fixture();
    let group = manager.create_group(None).unwrap();

    manager.close_group(group);

    let groups = manager.list_groups();
    assert_eq!(groups.len(), 1, "the manager never stays empty");
    assert_ne!(groups[0].id, group);
    assert!(groups[0].is_active);
    assert_eq!(manager.list_tabs(groups[0].id).len(), 1);
    assert_invariants(&manager, &host);
}

#[test]
fn closing_the_active_group_activates_the_slot_successor() {
    let (mut manager, host, _sink, _history) = fixture();
    let _g1 = manager.create_group(None).unwrap();
    let g2 = manager.create_group(None).unwrap();
    let g3 = manager.create_group(None).unwrap();

    // Middle case: closing B from [A, B, C] activates C.
    manager.set_active_group(g2);
    manager.close_group(g2);
    assert_eq!(manager.active_group_id(), Some(g3));
    assert_invariants(&manager, &host);
}

#[test]
fn closing_the_last_group_clamps_to_the_new_last() {
    let (mut manager, host, _sink, _history) = fixture();
    let _g1 = manager.create_group(None).unwrap();
    let g2 = manager.create_group(None).unwrap();
    let g3 = manager.create_group(None).unwrap();

    // Last case: closing C from [A, B, C] activates B.
    assert_eq!(manager.active_group_id(), Some(g3));
    manager.close_group(g3);
    assert_eq!(manager.active_group_id(), Some(g2));
    assert_invariants(&manager, &host);
}

#[test]
fn groups_never_share_a_partition() {
    let (mut manager, host, _sink, _history) = fixture();
    let g1 = manager.create_group(None).unwrap();
    manager.create_tab(Some("https://a.test/"));
    let g2 = manager.create_group(None).unwrap();
    manager.create_tab(Some("https://b.test/"));

    let p1 = manager.group(g1).unwrap().partition().clone();
    let p2 = manager.group(g2).unwrap().partition().clone();
    assert_ne!(p1, p2);

    // Every surface a group ever created carries that group's partition.
    assert_eq!(host.surfaces_in(&p1).len(), 2);
    assert_eq!(host.surfaces_in(&p2).len(), 2);
    for surface in host.surfaces_in(&p1) {
        assert_eq!(host.partition_of(surface).as_ref(), Some(&p1));
    }
}

#[test]
fn resize_lays_out_every_surface_of_the_active_group() {
    let (mut manager, host, _sink, _history) = fixture();
    let group = manager.create_group(None).unwrap();
    manager.create_tab(Some("https://a.test/"));
    manager.create_tab(Some("https://b.test/"));

    manager.handle_resize(Bounds::new(0, 0, 1000, 700));

    let partition = manager.group(group).unwrap().partition().clone();
    let expected = Bounds::new(0, 120, 1000, 580);
    for surface in host.surfaces_in(&partition) {
        assert_eq!(host.bounds_of(surface), Some(expected), "surface {surface}");
    }
}

#[test]
fn hidden_groups_are_laid_out_lazily_on_activation() {
    let (mut manager, host, _sink, _history) = fixture();
    let g1 = manager.create_group(None).unwrap();
    let g2 = manager.create_group(None).unwrap();
    assert_eq!(manager.active_group_id(), Some(g2));

    manager.handle_resize(Bounds::new(0, 0, 1000, 700));

    let stale = layout::content_viewport(window());
    let fresh = Bounds::new(0, 120, 1000, 580);
    let p1 = manager.group(g1).unwrap().partition().clone();
    for surface in host.surfaces_in(&p1) {
        assert_eq!(host.bounds_of(surface), Some(stale), "hidden group keeps stale layout");
    }

    manager.set_active_group(g1);
    for surface in host.surfaces_in(&p1) {
        assert_eq!(host.bounds_of(surface), Some(fresh), "activation re-lays-out");
    }
}

#[test]
fn closing_the_active_group_restores_the_successors_remembered_tab() {
    let (mut manager, host, sink, _history) = fixture();
    let g1 = manager.create_group(None).unwrap();
    manager.create_tab(Some("https://a.test/"));
    let g2 = manager.create_group(None).unwrap();
    let remembered = manager.create_tab(Some("https://b.test/")).unwrap();

    manager.set_active_group(g1);
    sink.take();

    manager.close_group(g1);

    assert_eq!(manager.active_group_id(), Some(g2));
    let tabs = manager.list_tabs(g2);
    assert_eq!(tabs.len(), 2);
    assert!(tabs.iter().any(|tab| tab.id == remembered && tab.is_active));

    let events = sink.take();
    let closures = events
        .iter()
        .filter(|event| matches!(event, Notification::GroupClosed { id } if *id == g1))
        .count();
    assert_eq!(closures, 1, "groupClosed emitted exactly once");
    assert!(events.iter().any(
        |event| matches!(event, Notification::GroupActivated { id, active_tab_id, .. }
            if *id == g2 && *active_tab_id == Some(remembered))
    ));
    assert_invariants(&manager, &host);
}

#[test]
fn group_creation_without_a_window_is_a_silent_noop() {
    let (mut manager, host, sink, _history) = fixture();
    host.set_window(None);

    assert_eq!(manager.create_group(None), None);
    assert_eq!(manager.group_count(), 0);
    assert!(sink.take().is_empty());
}

#[test]
fn tab_creation_without_a_group_routes_the_url_into_the_fresh_tab() {
    let (mut manager, host, _sink, _history) = fixture();

    let tab = manager.create_tab(Some("https://example.com/")).unwrap();
    pump(&mut manager, &host);

    assert_eq!(manager.group_count(), 1);
    let group = manager.active_group_id().unwrap();
    let tabs = manager.list_tabs(group);
    assert_eq!(tabs.len(), 1, "no second tab for the explicit url");
    assert_eq!(tabs[0].id, tab);
    assert_eq!(tabs[0].url, "https://example.com/");
    assert_invariants(&manager, &host);
}

#[test]
fn explicit_tab_creation_in_an_active_group_opens_and_activates() {
    let (mut manager, host, sink, _history) = fixture();
    let group = manager.create_group(None).unwrap();
    sink.take();

    let tab = manager.create_tab(Some("https://a.test/")).unwrap();

    let events = sink.take();
    assert!(matches!(
        &events[0],
        Notification::TabCreated { id, url } if *id == tab && url == "https://a.test/"
    ));
    assert!(matches!(&events[1], Notification::TabActivated { id, .. } if *id == tab));
    assert_eq!(manager.list_tabs(group).len(), 2);
    assert_eq!(manager.group(group).unwrap().last_active_tab(), Some(tab));
    assert_invariants(&manager, &host);
}

#[test]
fn history_records_only_the_viewport_owning_tab() {
    let (mut manager, host, sink, history) = fixture();
    let g1 = manager.create_group(None).unwrap();
    pump(&mut manager, &host);
    assert_eq!(history.take().len(), 1, "initial load of the active tab is recorded");

    manager.create_group(None).unwrap();
    pump(&mut manager, &host);
    assert_eq!(history.take().len(), 1, "only the new group's initial load");

    // A background navigation in the hidden group leaves no trace.
    let p1 = manager.group(g1).unwrap().partition().clone();
    let background = host.surfaces_in(&p1)[0];
    manager.handle_surface_event(
        background,
        SurfaceEvent::DidNavigate {
            url: "https://background.test/".to_string(),
        },
    );
    assert!(history.take().is_empty());

    sink.take();
    manager.navigate_to("https://foreground.test/");
    pump(&mut manager, &host);

    let entries = history.take();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].url, "https://foreground.test/");
    assert!(entries[0].timestamp > 0);
    assert!(sink
        .take()
        .iter()
        .any(|event| matches!(event, Notification::TabUpdated { url, can_go_back, .. }
            if url == "https://foreground.test/" && *can_go_back)));
}

#[test]
fn popup_requests_surface_as_open_external() {
    let (mut manager, host, sink, _history) = fixture();
    manager.create_group(None).unwrap();
    pump(&mut manager, &host);
    sink.take();

    let surface = manager.active_surface().unwrap();
    host.request_popup(surface, "https://popup.test/");
    pump(&mut manager, &host);

    assert_eq!(
        sink.take(),
        vec![Notification::OpenExternalRequested {
            url: "https://popup.test/".to_string()
        }]
    );
}

#[test]
fn closed_tabs_release_their_surfaces() {
    let (mut manager, host, _sink, _history) = fixture();
    let group = manager.create_group(None).unwrap();
    let first = manager.list_tabs(group)[0].id;
    let first_surface = manager.active_surface().unwrap();
    manager.create_tab(Some("https://a.test/"));

    manager.close_tab(group, first);

    assert!(host.is_destroyed(first_surface));
    assert_invariants(&manager, &host);
}

#[test]
fn closing_a_background_groups_tab_leaves_the_viewport_alone() {
    let (mut manager, host, _sink, _history) = fixture();
    let g1 = manager.create_group(None).unwrap();
    manager.create_tab(Some("https://a.test/"));
    let g2 = manager.create_group(None).unwrap();
    let foreground = manager.active_surface().unwrap();

    // Close the hidden group's active tab; its pointer moves, but nothing
    // of g1 may touch the viewport while g2 owns it.
    let active_in_g1 = manager
        .list_tabs(g1)
        .into_iter()
        .find(|tab| tab.is_active)
        .unwrap();
    manager.close_tab(g1, active_in_g1.id);

    assert_eq!(manager.active_group_id(), Some(g2));
    assert_eq!(host.attached(), vec![foreground]);
    assert_invariants(&manager, &host);
}

#[test]
fn unknown_ids_are_ignored_without_side_effects() {
    let (mut manager, host, sink, _history) = fixture();
    let group = manager.create_group(None).unwrap();
    sink.take();

    manager.set_active_group(GroupId::from_raw(999));
    manager.close_group(GroupId::from_raw(999));
    manager.rename_group(GroupId::from_raw(999), "ghost");
    manager.close_tab(GroupId::from_raw(999), manager.list_tabs(group)[0].id);

    assert!(sink.take().is_empty());
    assert_eq!(manager.active_group_id(), Some(group));
    assert_invariants(&manager, &host);
}

#[test]
fn rename_shows_up_in_listings_and_activation_payloads() {
    let (mut manager, _host, sink, _history) = fixture();
    let g1 = manager.create_group(None).unwrap();
    let g2 = manager.create_group(None).unwrap();

    manager.rename_group(g1, "Research");
    assert_eq!(manager.list_groups()[0].name, "Research");

    sink.take();
    manager.set_active_group(g1);
    assert!(sink.take().iter().any(
        |event| matches!(event, Notification::GroupActivated { id, name, .. }
            if *id == g1 && name == "Research")
    ));
    let _ = g2;
}

#[test]
fn back_and_forward_follow_the_surface_history() {
    let (mut manager, host, _sink, _history) = fixture();
    let group = manager.create_group(None).unwrap();
    manager.navigate_to("https://a.test/");
    manager.navigate_to("https://b.test/");
    pump(&mut manager, &host);

    manager.go_back();
    pump(&mut manager, &host);
    let active = |manager: &GroupManager| {
        manager
            .list_tabs(group)
            .into_iter()
            .find(|tab| tab.is_active)
            .unwrap()
    };
    assert_eq!(active(&manager).url, "https://a.test/");

    manager.go_forward();
    pump(&mut manager, &host);
    assert_eq!(active(&manager).url, "https://b.test/");

    // Refresh keeps the address.
    manager.refresh();
    pump(&mut manager, &host);
    assert_eq!(active(&manager).url, "https://b.test/");
}
