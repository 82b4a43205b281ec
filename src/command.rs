//! Single-byte host commands.

use crate::consts::{CMD_RESET, CMD_STATUS};
use crate::error::Error;

/// A request sent by the host, one ASCII byte with no payload.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
#[cfg_attr(feature = "defmt-0-3", derive(defmt::Format))]
pub enum Command {
    /// `R`: clear the encoder delta and acknowledge with `[R]\r\n`.
    Reset,
    /// `S`: report encoder delta and switch state.
    Status,
}

impl Command {
    /// The wire byte for this command.
    pub const fn as_byte(self) -> u8 {
        match self {
            Command::Reset => CMD_RESET,
            Command::Status => CMD_STATUS,
        }
    }
}

impl TryFrom<u8> for Command {
    type Error = Error;

    fn try_from(byte: u8) -> Result<Self, Self::Error> {
        match byte {
            CMD_RESET => Ok(Command::Reset),
            CMD_STATUS => Ok(Command::Status),
            other => Err(Error::UnknownCommand(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_commands() {
        assert_eq!(Command::try_from(b'R'), Ok(Command::Reset));
        assert_eq!(Command::try_from(b'S'), Ok(Command::Status));
        assert_eq!(Command::Status.as_byte(), b'S');
    }

    #[test]
    fn test_commands_are_case_sensitive() {
        assert_eq!(Command::try_from(b'r'), Err(Error::UnknownCommand(b'r')));
        assert_eq!(Command::try_from(b's'), Err(Error::UnknownCommand(b's')));
    }
}
