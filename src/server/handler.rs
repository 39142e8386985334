//! Per-connection handshake inspection
//!
//! Runs both handshake phases on one client stream, logs what the client
//! asked for and refuses it.

use crate::config::Config;
use crate::error::{HandshakeError, ParseError};
use crate::socks::{
    select_method, send_method_selection, send_socks4_reply, send_socks5_reply, HandshakeEvent,
    HandshakeParser, Request, Session, SOCKS4_REPLY_REJECTED,
    SOCKS5_AUTH_METHOD_NOT_ACCEPTABLE, SOCKS5_REPLY_ADDRESS_TYPE_NOT_SUPPORTED,
    SOCKS5_REPLY_COMMAND_NOT_SUPPORTED, SOCKS5_REPLY_CONNECTION_NOT_ALLOWED, SOCKS5_VERSION,
};
use anyhow::{bail, Context, Result};
use std::time::Duration;
use tokio::io::{AsyncRead, AsyncWrite};
use tracing::{debug, info, warn};

/// Inspect the handshake on a client stream
///
/// # Protocol Flow
///
/// 1. SOCKS5 greeting: answer with NO AUTHENTICATION, or 0xFF and close
/// 2. Reattach the parser as authenticated and read the request
/// 3. SOCKS4/4a clients skip straight to the request
/// 4. Log the request and answer with a refusal
///
/// # Returns
///
/// The decoded request, or `None` if the client left before sending one
/// or offered no acceptable method.
pub async fn handle_connection<S>(stream: S, config: &Config) -> Result<Option<Request>>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let parser = HandshakeParser::with_config(&config.handshake);
    let mut session = Session::with_parser(stream, parser);
    let timeout = Duration::from_secs(config.server.handshake_timeout);

    let first = match session.next_event_timeout(timeout).await {
        Ok(Some(event)) => event,
        Ok(None) => {
            debug!("Client closed before sending a handshake");
            return Ok(None);
        }
        Err(e) => return Err(e).with_context(|| "Failed to read handshake"),
    };

    let request = match first {
        HandshakeEvent::Request(request) => request,
        HandshakeEvent::Methods(methods) => {
            let method = select_method(&methods);
            send_method_selection(session.stream_mut(), method).await?;

            if method == SOCKS5_AUTH_METHOD_NOT_ACCEPTABLE {
                warn!("No acceptable auth method in {:02x?}", methods);
                return Ok(None);
            }
            debug!("Selected auth method 0x{:02x}", method);

            session.set_authed(true);
            session.attach()?;

            match session.next_event_timeout(timeout).await {
                Ok(Some(HandshakeEvent::Request(request))) => request,
                Ok(Some(HandshakeEvent::Methods(_))) => bail!("Unexpected greeting after auth"),
                Ok(None) => {
                    debug!("Client closed after method selection");
                    return Ok(None);
                }
                Err(e) => {
                    reply_to_error(&mut session, &e).await?;
                    return Err(e).with_context(|| "Failed to read SOCKS5 request");
                }
            }
        }
    };

    info!("{}", request);

    if request.version.is_socks4() {
        send_socks4_reply(session.stream_mut(), SOCKS4_REPLY_REJECTED).await?;
    } else {
        send_socks5_reply(
            session.stream_mut(),
            SOCKS5_REPLY_CONNECTION_NOT_ALLOWED,
            None,
        )
        .await?;
    }

    Ok(Some(request))
}

/// Tell a SOCKS5 client why its request was not understood
async fn reply_to_error<S>(session: &mut Session<S>, err: &HandshakeError) -> Result<()>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let code = match err.as_parse() {
        Some(ParseError::InvalidCommand {
            version: SOCKS5_VERSION,
            ..
        }) => SOCKS5_REPLY_COMMAND_NOT_SUPPORTED,
        Some(ParseError::InvalidAddressType(_)) => SOCKS5_REPLY_ADDRESS_TYPE_NOT_SUPPORTED,
        _ => return Ok(()),
    };

    send_socks5_reply(session.stream_mut(), code, None).await
}
