//! Auswertung von HTTP/1.x-Antworten für die einfachen Clients
//! (Bewegungsmelder → LED-Server, Steckdose → Wechselrichter-Bridge)

/// Statuscode aus `HTTP/1.x NNN ...`
pub fn parse_status_code(response: &[u8]) -> Option<u16> {
    let line_end = response
        .iter()
        .position(|&b| b == b'\r' || b == b'\n')
        .unwrap_or(response.len());
    let line = core::str::from_utf8(&response[..line_end]).ok()?;
    let mut parts = line.split(' ');
    if !parts.next()?.starts_with("HTTP/") {
        return None;
    }
    let code = parts.next()?;
    if code.len() != 3 {
        return None;
    }
    code.parse().ok()
}

/// Body hinter der Leerzeile, `None` wenn der Header nicht vollständig ist
pub fn response_body(response: &[u8]) -> Option<&[u8]> {
    response
        .windows(4)
        .position(|window| window == b"\r\n\r\n")
        .map(|pos| &response[pos + 4..])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_code() {
        assert_eq!(parse_status_code(b"HTTP/1.1 200 OK\r\n"), Some(200));
        assert_eq!(parse_status_code(b"HTTP/1.0 503 Service Unavailable"), Some(503));
        assert_eq!(parse_status_code(b"HTTP/1.1 20"), None);
        assert_eq!(parse_status_code(b"SSH-2.0 200"), None);
        assert_eq!(parse_status_code(b""), None);
    }

    #[test]
    fn test_body_after_headers() {
        let response = b"HTTP/1.1 200 OK\r\nContent-Length: 3\r\n\r\nabc";
        assert_eq!(response_body(response), Some(&b"abc"[..]));
        assert_eq!(response_body(b"HTTP/1.1 200 OK\r\nContent-"), None);
    }
}
