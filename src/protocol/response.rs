//! Response definitions
//!
//! Represents responses to clients and their exact wire serialization.

/// A response to send to a client
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Response {
    /// Successful write: `OK <version>\r\n`
    Ok { version: u64 },

    /// Successful get: `VALUE <bytes>\r\n<payload>\r\n`
    Value { payload: Vec<u8> },

    /// Successful getm: `VALUE <version>\r\n`
    Version { version: u64 },

    /// Successful delete: `DELETED\r\n`
    Deleted,

    /// Key absent or expired: `ERR_NOT_FOUND\r\n`
    NotFound,

    /// CAS precondition failed: `ERR_VERSION_MISMATCH\r\n`
    VersionMismatch,

    /// Key owned by another node: `ERR_REDIRECT <host> <port>\r\n`
    Redirect { host: String, port: u16 },

    /// Malformed command framing: `ERR_CMD_ERR\r\n`
    CmdError,
}

impl Response {
    /// Serialize to the exact wire bytes
    pub fn to_bytes(&self) -> Vec<u8> {
        match self {
            Response::Ok { version } => format!("OK {}\r\n", version).into_bytes(),
            Response::Value { payload } => {
                let mut out = format!("VALUE {}\r\n", payload.len()).into_bytes();
                out.extend_from_slice(payload);
                out.extend_from_slice(b"\r\n");
                out
            }
            Response::Version { version } => format!("VALUE {}\r\n", version).into_bytes(),
            Response::Deleted => b"DELETED\r\n".to_vec(),
            Response::NotFound => b"ERR_NOT_FOUND\r\n".to_vec(),
            Response::VersionMismatch => b"ERR_VERSION_MISMATCH\r\n".to_vec(),
            Response::Redirect { host, port } => {
                format!("ERR_REDIRECT {} {}\r\n", host, port).into_bytes()
            }
            Response::CmdError => b"ERR_CMD_ERR\r\n".to_vec(),
        }
    }
}
