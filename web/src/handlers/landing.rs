//! Landing page with the sign-in and sign-up forms.

use axum::response::Html;

const LANDING_PAGE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>Sign In</title>
  <style>
    body { font-family: system-ui, sans-serif; max-width: 28rem; margin: 3rem auto; padding: 0 1rem; }
    form { display: grid; gap: .5rem; margin-bottom: 2rem; }
    input, button { font: inherit; padding: .5rem; }
    #result { min-height: 1.5rem; }
  </style>
</head>
<body>
  <h1>Sign In</h1>
  <form data-endpoint="/request-sign-in">
    <input name="email" type="email" placeholder="Email" required>
    <button type="submit">Email me a sign-in link</button>
  </form>

  <h1>Sign Up</h1>
  <form data-endpoint="/sign-up">
    <input name="username" placeholder="Username" required>
    <input name="email" type="email" placeholder="Email" required>
    <input name="firstName" placeholder="First name">
    <input name="lastName" placeholder="Last name">
    <button type="submit">Sign up</button>
  </form>

  <p id="result"></p>

  <script>
    for (const form of document.querySelectorAll("form")) {
      form.addEventListener("submit", async (event) => {
        event.preventDefault();
        const body = Object.fromEntries(new FormData(form));
        const response = await fetch(form.dataset.endpoint, {
          method: "POST",
          headers: { "Content-Type": "application/json" },
          body: JSON.stringify(body),
        });
        const reply = await response.json();
        document.getElementById("result").textContent = reply.success ?? reply.error;
      });
    }
  </script>
</body>
</html>
"#;

/// Serve the landing page.
///
/// # Endpoint
///
/// ```text
/// GET /
/// ```
#[allow(clippy::unused_async)]
pub async fn landing_page() -> Html<&'static str> {
    Html(LANDING_PAGE)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_page_posts_to_both_flows() {
        let Html(page) = landing_page().await;

        assert!(page.contains(r#"data-endpoint="/request-sign-in""#));
        assert!(page.contains(r#"data-endpoint="/sign-up""#));
        assert!(page.contains(r#"name="firstName""#));
    }
}
