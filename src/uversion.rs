// uversion.rs - Port of uversion.h (UVersionInfo, u_versionToString, u_versionFromString)

use std::fmt;
use std::str::FromStr;

use crate::utypes::*;

pub const U_MAX_VERSION_LENGTH: usize = 4;

/// Unicode version the normalization code is written against. Data blobs
/// must carry the same major version.
pub const U_UNICODE_VERSION: UVersionInfo = UVersionInfo::new(14, 0, 0, 0);

/// A four-component version (`major.minor.patch.build`), ordered
/// component-wise like ICU's `memcmp` on `UVersionInfo`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UVersionInfo(pub [u8; U_MAX_VERSION_LENGTH]);

impl UVersionInfo {
    pub const fn new(major: u8, minor: u8, patch: u8, build: u8) -> Self {
        UVersionInfo([major, minor, patch, build])
    }

    pub fn major(&self) -> u8 {
        self.0[0]
    }

    pub fn minor(&self) -> u8 {
        self.0[1]
    }

    pub fn patch(&self) -> u8 {
        self.0[2]
    }

    pub fn build(&self) -> u8 {
        self.0[3]
    }
}

impl fmt::Display for UVersionInfo {
    /// Trailing zero components are dropped, but `major.minor` is always written.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut count = U_MAX_VERSION_LENGTH;
        while count > 2 && self.0[count - 1] == 0 {
            count -= 1;
        }
        write!(f, "{}", self.0[0])?;
        for part in &self.0[1..count] {
            write!(f, ".{}", part)?;
        }
        Ok(())
    }
}

impl FromStr for UVersionInfo {
    type Err = UErrorCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = [0u8; U_MAX_VERSION_LENGTH];
        let mut count = 0;
        for field in s.split('.') {
            if count == U_MAX_VERSION_LENGTH {
                return Err(U_ILLEGAL_ARGUMENT_ERROR);
            }
            parts[count] = field.trim().parse().map_err(|_| U_ILLEGAL_ARGUMENT_ERROR)?;
            count += 1;
        }
        Ok(UVersionInfo(parts))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_drops_trailing_zeros() {
        assert_eq!(UVersionInfo::new(14, 0, 0, 0).to_string(), "14.0");
        assert_eq!(UVersionInfo::new(6, 3, 0, 0).to_string(), "6.3");
        assert_eq!(UVersionInfo::new(15, 1, 2, 0).to_string(), "15.1.2");
        assert_eq!(UVersionInfo::new(1, 0, 0, 7).to_string(), "1.0.0.7");
    }

    #[test]
    fn parse() {
        assert_eq!("14".parse(), Ok(UVersionInfo::new(14, 0, 0, 0)));
        assert_eq!("15.1.2".parse(), Ok(UVersionInfo::new(15, 1, 2, 0)));
        assert_eq!("1.2.3.4.5".parse::<UVersionInfo>(), Err(U_ILLEGAL_ARGUMENT_ERROR));
        assert_eq!("1.256".parse::<UVersionInfo>(), Err(U_ILLEGAL_ARGUMENT_ERROR));
        assert_eq!("".parse::<UVersionInfo>(), Err(U_ILLEGAL_ARGUMENT_ERROR));
    }

    #[test]
    fn ordering() {
        assert!(UVersionInfo::new(13, 0, 0, 0) < UVersionInfo::new(14, 0, 0, 0));
        assert!(UVersionInfo::new(14, 0, 1, 0) > UVersionInfo::new(14, 0, 0, 9));
    }
}
