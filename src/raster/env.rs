use gdal::config::{clear_config_option, get_config_option, set_config_option};
use gdal::errors::GdalError;
use log::debug;

/// GDAL configuration options that stay set while the guard is alive. The
/// previous values come back on drop.
#[derive(Debug)]
pub struct GdalEnv {
    previous: Vec<(String, Option<String>)>,
}

impl GdalEnv {
    pub fn set<K, V>(options: &[(K, V)]) -> Result<Self, GdalError>
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut env = GdalEnv {
            previous: Vec::with_capacity(options.len()),
        };

        for (key, value) in options {
            let key = key.as_ref();
            let old = get_config_option(key, "")?;
            env.previous
                .push((key.to_string(), (!old.is_empty()).then_some(old)));
            set_config_option(key, value.as_ref())?;
            debug!("GDAL option {}={}", key, value.as_ref());
        }

        Ok(env)
    }
}

impl Drop for GdalEnv {
    fn drop(&mut self) {
        for (key, old) in self.previous.drain(..).rev() {
            let restored = match old {
                Some(value) => set_config_option(&key, &value),
                None => clear_config_option(&key),
            };
            if let Err(e) = restored {
                debug!("Could not restore GDAL option {}: {}", key, e);
            }
        }
    }
}
