use crate::common::{TestApp, routes};

#[tokio::test]
async fn counties_are_listed_by_state_then_name() {
    let app = TestApp::spawn().await;

    let res = app.get_without_token(routes::COUNTIES).await;

    assert_eq!(res.status, 200, "{}", res.text);
    assert_eq!(res.body["pagination"]["total"], 4);
    let names: Vec<&str> = res.body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Autauga", "Alameda", "Santa Clara", "New York"]);
}

#[tokio::test]
async fn state_filter_is_case_insensitive() {
    let app = TestApp::spawn().await;

    let res = app
        .get_without_token(&format!("{}?state=ca", routes::COUNTIES))
        .await;

    assert_eq!(res.status, 200);
    assert_eq!(res.body["pagination"]["total"], 2);
    assert_eq!(res.body["data"][0]["key"], "06001");
}

#[tokio::test]
async fn county_is_fetched_by_numeric_id() {
    let app = TestApp::spawn().await;

    let res = app.get_without_token(&routes::county(6085)).await;

    assert_eq!(res.status, 200);
    assert_eq!(res.body["name"], "Santa Clara");
    assert_eq!(res.body["state"], "CA");
    assert_eq!(res.body["key"], "06085");
}

#[tokio::test]
async fn unknown_county_is_not_found() {
    let app = TestApp::spawn().await;

    let res = app.get_without_token(&routes::county(99999)).await;

    assert_eq!(res.status, 404);
}
