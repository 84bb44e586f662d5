use mreview_e2e_tests::{
    launch_env,
    rest::{MovieForm, create_movie, list_movies, page},
};
use tracing_test::traced_test;

#[tokio::test]
#[traced_test]
async fn test_delete_movie() {
    let env = launch_env("test_delete_movie").await.unwrap();
    let movie = create_movie(&env, MovieForm::inception(env.genre_id("Sci-Fi")))
        .await
        .unwrap();

    // confirmation page must not delete
    let (status, body) = page(&env, &format!("movies/delete/{}", movie.id))
        .await
        .unwrap();
    assert_eq!(status, 200);
    assert!(body.contains("Inception"));
    assert_eq!(list_movies(&env).await.unwrap().len(), 1);

    let response = env
        .client
        .post(env.url(&format!("movies/delete/{}", movie.id)))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);
    assert_eq!(response.text().await.unwrap(), "OK");

    let (status, _) = page(&env, &format!("movies/details/{}", movie.id))
        .await
        .unwrap();
    assert_eq!(status, 404);
    assert!(list_movies(&env).await.unwrap().is_empty());

    let response = env
        .client
        .delete(env.url(&format!("movies/{}", movie.id)))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 404);
}

#[tokio::test]
#[traced_test]
async fn test_delete_by_http_method() {
    let env = launch_env("test_delete_by_http_method").await.unwrap();
    let movie = create_movie(&env, MovieForm::inception(env.genre_id("Comedy")))
        .await
        .unwrap();

    let response = env
        .client
        .delete(env.url(&format!("movies/{}", movie.id)))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);
    assert!(list_movies(&env).await.unwrap().is_empty());

    let response = env.client.post(env.url("movies/delete")).send().await.unwrap();
    assert_eq!(response.status().as_u16(), 400);
    let (status, _) = page(&env, "movies/details").await.unwrap();
    assert_eq!(status, 400);
}
