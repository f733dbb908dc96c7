use axum::{
    Json,
    http::{Method, StatusCode, Uri},
    response::{Html, IntoResponse, Redirect, Response},
};
use tower_sessions::Session;

use super::{ApiError, ErrorBody, SessionUser, auth::SESSION_USER_KEY};

async fn session_user(session: &Session) -> Result<Option<SessionUser>, ApiError> {
    session
        .get::<SessionUser>(SESSION_USER_KEY)
        .await
        .map_err(|e| ApiError::internal(format!("Session error: {e}")))
}

/// GET /
pub async fn index() -> Html<String> {
    Html(page(
        "PIX Wallet",
        r#"
        <h1>PIX Wallet</h1>
        <p id="greeting">Carregando...</p>
        <p><a class="button" href="/auth/discord">Entrar com Discord</a></p>
        <p>
            <a href="/seguranca">Segurança</a> ·
            <a href="/saldo/historico">Histórico de saldo</a>
        </p>
        <script>
            fetch('/api/me').then(r => r.json()).then(me => {
                const el = document.getElementById('greeting');
                el.textContent = me.loggedIn
                    ? `Olá, ${me.user.username} — saldo R$ ${me.user.balance.toFixed(2)}`
                    : 'Você não está logado.';
            });
        </script>
        "#,
    ))
}

/// GET /seguranca
/// Security dashboard: security code, login history, and client-side
/// camera QR scanning (html5-qrcode runs entirely in the browser).
pub async fn security_page(session: Session) -> Result<Response, ApiError> {
    if session_user(&session).await?.is_none() {
        return Ok(Redirect::to("/").into_response());
    }

    Ok(Html(page(
        "Segurança",
        r#"
        <h1>Segurança da conta</h1>
        <p>Código de segurança: <strong id="code">...</strong></p>
        <h2>Leitor de QR code</h2>
        <div id="qr-reader" style="width: 320px"></div>
        <p id="qr-result"></p>
        <h2>Últimos logins</h2>
        <ul id="logins"></ul>
        <script src="https://unpkg.com/html5-qrcode@2.3.8/html5-qrcode.min.js"></script>
        <script>
            fetch('/api/security/info').then(r => r.json()).then(info => {
                document.getElementById('code').textContent = info.code;
                const list = document.getElementById('logins');
                for (const login of info.logins) {
                    const item = document.createElement('li');
                    item.textContent = `${login.date} — ${login.userAgent}`;
                    list.appendChild(item);
                }
            });

            new Html5Qrcode('qr-reader').start(
                { facingMode: 'environment' },
                { fps: 10, qrbox: 250 },
                text => { document.getElementById('qr-result').textContent = text; }
            ).catch(() => {
                document.getElementById('qr-result').textContent =
                    'Câmera indisponível.';
            });
        </script>
        "#,
    ))
    .into_response())
}

/// GET /saldo/historico
pub async fn balance_history_page(session: Session) -> Result<Response, ApiError> {
    if session_user(&session).await?.is_none() {
        return Ok(Redirect::to("/").into_response());
    }

    Ok(Html(page(
        "Histórico de saldo",
        r#"
        <h1>Histórico de saldo</h1>
        <p>Em breve: extrato de depósitos e créditos.</p>
        <p><a href="/">Voltar</a></p>
        "#,
    ))
    .into_response())
}

/// Catch-all: styled 404 page for GET, JSON error object otherwise.
pub async fn not_found(method: Method, uri: Uri) -> Response {
    if method == Method::GET {
        (
            StatusCode::NOT_FOUND,
            Html(page(
                "404",
                r#"
                <h1>404</h1>
                <p>Página não encontrada.</p>
                <p><a href="/">Voltar ao início</a></p>
                "#,
            )),
        )
            .into_response()
    } else {
        tracing::debug!("No route for {} {}", method, uri.path());
        (
            StatusCode::NOT_FOUND,
            Json(ErrorBody {
                error: "Not found".to_string(),
            }),
        )
            .into_response()
    }
}

fn page(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="pt-BR">
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1">
    <title>{title}</title>
    <link rel="stylesheet" href="/static/styles.css">
</head>
<body>
{body}
</body>
</html>"#
    )
}
