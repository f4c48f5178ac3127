use crux_core::testing::AppTester;
use shared::capabilities::USER_NAME_KEY;
use shared::{Effect, Event, Model, Rank, Screen, ScreenView};

#[test]
fn first_launch_registers_and_greets() {
    let app = AppTester::<shared::App, Effect>::default();
    let mut model = Model::default();

    // 1. Started: ask storage for a saved name
    let update = app.update(Event::Started { config: None }, &mut model);
    assert!(update.effects.iter().any(|e| matches!(e, Effect::KeyValue(_))));
    assert_eq!(model.session.screen(), Screen::Unregistered);

    // 2. Nothing stored
    app.update(Event::SavedNameLoaded(Ok(None)), &mut model);
    assert_eq!(model.session.screen(), Screen::Unregistered);

    // 3. Type and register
    app.update(Event::RegistrationNameChanged("  Sopheap ".into()), &mut model);
    let update = app.update(Event::RegisterRequested, &mut model);
    assert!(update.effects.iter().any(|e| matches!(e, Effect::KeyValue(_))));
    assert!(update.effects.iter().any(|e| matches!(e, Effect::Render(_))));

    let profile = model.session.profile().unwrap();
    assert_eq!(profile.name().as_str(), "Sopheap");
    assert_eq!(profile.points(), 50);
    assert_eq!(profile.rank(), Rank::NoviceGuardian);

    let ScreenView::Home { greeting, .. } = app.view(&model).screen else {
        panic!("expected home screen");
    };
    assert_eq!(greeting, "Welcome, Sopheap");
}

#[test]
fn returning_user_skips_registration() {
    let app = AppTester::<shared::App, Effect>::default();
    let mut model = Model::default();

    app.update(Event::Started { config: None }, &mut model);
    app.update(Event::SavedNameLoaded(Ok(Some(b"Sopheap".to_vec()))), &mut model);

    let profile = model.session.profile().unwrap();
    assert_eq!(model.session.screen(), Screen::Home);
    assert_eq!(profile.points(), 1_250);
    assert_eq!(profile.rank(), Rank::HeritageGuardian);
    assert!(profile.history().is_empty());
}

#[test]
fn restored_points_follow_config() {
    let app = AppTester::<shared::App, Effect>::default();
    let mut model = Model::default();

    app.update(
        Event::Started {
            config: Some(r#"{"restored_points": 300}"#.into()),
        },
        &mut model,
    );
    app.update(Event::SavedNameLoaded(Ok(Some(b"Kosal".to_vec()))), &mut model);

    assert_eq!(model.session.profile().unwrap().points(), 300);
    assert_eq!(
        model.session.profile().unwrap().rank(),
        Rank::NoviceGuardian
    );
}

#[test]
fn storage_failure_falls_back_to_registration() {
    let app = AppTester::<shared::App, Effect>::default();
    let mut model = Model::default();

    app.update(
        Event::SavedNameLoaded(Err(shared::AppError::new(
            shared::ErrorKind::Storage,
            "unavailable",
        ))),
        &mut model,
    );

    assert_eq!(model.session.screen(), Screen::Unregistered);
    assert!(model.notice.is_none());
}

#[test]
fn second_register_is_ignored() {
    let app = AppTester::<shared::App, Effect>::default();
    let mut model = Model::default();
    app.update(Event::RegistrationNameChanged("Dara".into()), &mut model);
    app.update(Event::RegisterRequested, &mut model);

    app.update(Event::RegistrationNameChanged("Someone".into()), &mut model);
    let update = app.update(Event::RegisterRequested, &mut model);

    assert!(!update.effects.iter().any(|e| matches!(e, Effect::KeyValue(_))));
    assert_eq!(model.session.profile().unwrap().name().as_str(), "Dara");
}

#[test]
fn name_key_matches_storage_contract() {
    assert_eq!(USER_NAME_KEY, "s-robot-user-name");
}
