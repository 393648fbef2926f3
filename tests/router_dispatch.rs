use campus_core::router::{Dispatch, Method, RouteError, Router};

#[test]
fn extracts_declared_params_and_nothing_else() -> Result<(), Box<dyn std::error::Error>> {
    let mut router = Router::new();
    router.get("/classes/{id}/students", "list_students")?;

    let matched = router
        .dispatch(Method::Get, "/classes/42/students")
        .into_match()
        .expect("route should match");
    assert_eq!(*matched.handler, "list_students");
    assert_eq!(matched.params.get("id"), Some("42"));
    assert_eq!(matched.params.len(), 1);
    assert_eq!(matched.template, "/classes/{id}/students");

    // One extra segment is a different shape.
    assert!(router
        .dispatch(Method::Get, "/classes/42/students/extra")
        .is_not_found());
    Ok(())
}

#[test]
fn first_registered_route_wins_on_overlap() -> Result<(), Box<dyn std::error::Error>> {
    let mut router = Router::new();
    router.get("/users/profile", "static_profile")?;
    router.get("/users/{name}", "by_name")?;

    let matched = router
        .dispatch(Method::Get, "/users/profile")
        .into_match()
        .expect("route should match");
    assert_eq!(*matched.handler, "static_profile");
    assert!(matched.params.is_empty());

    let matched = router
        .dispatch(Method::Get, "/users/ada")
        .into_match()
        .expect("route should match");
    assert_eq!(*matched.handler, "by_name");
    assert_eq!(matched.params.get("name"), Some("ada"));
    Ok(())
}

#[test]
fn same_shape_registration_keeps_the_first() -> Result<(), Box<dyn std::error::Error>> {
    let mut router = Router::new();
    router.get("/schools/{id}", "first")?;
    // Same shape, different param name: dispatch could never tell them apart.
    router.get("/schools/{school}", "second")?;

    assert_eq!(router.len(), 1);
    let matched = router
        .dispatch(Method::Get, "/schools/3")
        .into_match()
        .expect("route should match");
    assert_eq!(*matched.handler, "first");
    assert_eq!(matched.params.get("id"), Some("3"));
    Ok(())
}

#[test]
fn methods_route_independently() -> Result<(), Box<dyn std::error::Error>> {
    let mut router = Router::new();
    router.get("/grades", "list")?;
    router.post("/grades", "create")?;

    let matched = router
        .dispatch(Method::Post, "/grades")
        .into_match()
        .expect("route should match");
    assert_eq!(*matched.handler, "create");
    assert!(router.dispatch(Method::Delete, "/grades").is_not_found());
    assert!(router.dispatch(Method::Get, "/nope").is_not_found());
    Ok(())
}

#[test]
fn normalizes_trailing_slash_and_root() -> Result<(), Box<dyn std::error::Error>> {
    let mut router = Router::new();
    router.get("/", "home")?;
    router.get("/classes", "classes")?;

    for path in ["/", ""] {
        let matched = router
            .dispatch(Method::Get, path)
            .into_match()
            .expect("root should match");
        assert_eq!(*matched.handler, "home");
    }
    let matched = router
        .dispatch(Method::Get, "/classes/")
        .into_match()
        .expect("trailing slash should match");
    assert_eq!(*matched.handler, "classes");
    Ok(())
}

#[test]
fn malformed_templates_fail_at_registration() {
    let mut router: Router<&str> = Router::new();
    assert!(matches!(
        router.get("/classes/{id", "h"),
        Err(RouteError::UnbalancedBraces { .. })
    ));
    assert!(matches!(
        router.get("/classes/{}", "h"),
        Err(RouteError::EmptyParam { .. })
    ));
    assert!(matches!(
        router.get("/schools/{id}/classes/{id}", "h"),
        Err(RouteError::DuplicateParam { .. })
    ));
    assert!(router.is_empty());
}

#[test]
fn groups_prefix_and_merge_without_overwriting() -> Result<(), Box<dyn std::error::Error>> {
    let mut router = Router::new();
    router.get("/api/health", "health")?;

    router.group("/api", |api| {
        api.get("/schools/{id}", "school")?;
        // Already registered at the top level; the earlier route survives.
        api.get("/health", "shadowed")?;
        api.group("/admin", |admin| admin.post("/terms", "create_term"))
    })?;

    let matched = router
        .dispatch(Method::Get, "/api/schools/7")
        .into_match()
        .expect("grouped route should match");
    assert_eq!(*matched.handler, "school");
    assert_eq!(matched.params.get("id"), Some("7"));

    let matched = router
        .dispatch(Method::Get, "/api/health")
        .into_match()
        .expect("route should match");
    assert_eq!(*matched.handler, "health");

    let matched = router
        .dispatch(Method::Post, "/api/admin/terms")
        .into_match()
        .expect("nested group route should match");
    assert_eq!(*matched.handler, "create_term");
    Ok(())
}

#[test]
fn unknown_methods_do_not_parse() {
    assert!("PATCH".parse::<Method>().is_err());
    assert_eq!("get".parse::<Method>().unwrap(), Method::Get);
    assert_eq!("DELETE".parse::<Method>().unwrap(), Method::Delete);
}
