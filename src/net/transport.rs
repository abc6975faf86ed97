/// Wire protocol with the world server.
///
/// Server → agent: a 24-byte view per tick, no framing beyond the length.
/// Agent → server: one command byte per tick.

use std::io::{self, ErrorKind, Read, Write};
use std::net::TcpStream;

use tracing::{debug, info};

use crate::domain::entity::ActionStep;
use crate::error::{AgentError, AgentResult};
use crate::sim::map::VIEW_LEN;

pub struct Transport<S> {
    stream: S,
}

impl Transport<TcpStream> {
    pub fn connect(host: &str, port: u16) -> AgentResult<Self> {
        let stream = TcpStream::connect((host, port))?;
        stream.set_nodelay(true)?;
        info!(host, port, "connected to world server");
        Ok(Transport::new(stream))
    }
}

impl<S: Read + Write> Transport<S> {
    pub fn new(stream: S) -> Self {
        Transport { stream }
    }

    /// Next view, or `None` once the server has closed the connection
    /// between views (game over).
    pub fn read_view(&mut self) -> AgentResult<Option<[u8; VIEW_LEN]>> {
        let mut view = [0u8; VIEW_LEN];
        let mut filled = 0;
        while filled < VIEW_LEN {
            match self.stream.read(&mut view[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) if filled == 0 && is_disconnect(&e) => break,
                Err(e) => return Err(e.into()),
            }
        }

        match filled {
            0 => {
                debug!("server closed connection");
                Ok(None)
            }
            VIEW_LEN => Ok(Some(view)),
            n => Err(AgentError::Protocol {
                message: format!("connection closed after {n} of {VIEW_LEN} view bytes"),
            }),
        }
    }

    pub fn send(&mut self, action: ActionStep) -> AgentResult<()> {
        self.stream.write_all(&[action.command()])?;
        self.stream.flush()?;
        Ok(())
    }
}

fn is_disconnect(e: &io::Error) -> bool {
    matches!(
        e.kind(),
        ErrorKind::ConnectionReset | ErrorKind::ConnectionAborted | ErrorKind::BrokenPipe
    )
}
