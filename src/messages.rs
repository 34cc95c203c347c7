use crate::locale::{Locale, LocaleEvent, LocaleListener};
use parking_lot::{Mutex, RwLock};
use std::collections::HashMap;
use std::fmt;
use tracing::{debug, warn};

const EN: &[(&str, &str)] = &[
    ("column.current", "Now"),
    ("column.index", "#"),
    ("column.title", "Title"),
    ("column.path", "File"),
    ("state.stopped", "Stopped"),
    ("state.playing", "Playing"),
    ("state.paused", "Paused"),
    ("status.ready", "Ready"),
    ("status.now_playing", "Now playing {0}"),
    ("status.paused", "Paused"),
    ("status.stopped", "Stopped"),
    ("status.nothing_to_do", "Nothing to do"),
    ("status.empty_playlist", "Playlist is empty"),
    ("status.end_of_playlist", "Reached end of playlist"),
    ("status.added", "Added {0} tracks"),
    ("status.no_midi", "No MIDI files found at {0}"),
    ("status.removed", "Removed track {0}"),
    ("status.moved", "Moved track {0} to {1}"),
    ("status.no_track", "No track {0}"),
    ("status.selected", "Selected {0}"),
    ("status.unknown_command", "Unknown command {0}. Try help"),
    ("status.usage", "Usage: {0}"),
    ("status.cleared", "Playlist cleared"),
    ("status.shuffled", "Playlist shuffled"),
    ("status.sorted", "Playlist sorted"),
    ("status.loop", "Track looping: {0}"),
    ("status.playlist_loop", "Playlist looping: {0}"),
    ("status.locale", "Locale: {0}"),
    ("status.saved", "State saved"),
    ("status.save_failed", "Save failed: {0}"),
    ("status.error", "Playback error: {0}"),
    ("word.on", "on"),
    ("word.off", "off"),
    (
        "help.text",
        "Commands: play | pause | stop | next | previous | goto <n> | loop [on|off] | \
         playlist-loop [on|off] | shuffle | sort | add <path> | remove <n> | \
         move <from> <to> | clear | list | locale [tag] | save | quit",
    ),
];

const DE: &[(&str, &str)] = &[
    ("column.current", "Aktuell"),
    ("column.title", "Titel"),
    ("column.path", "Datei"),
    ("state.stopped", "Gestoppt"),
    ("state.playing", "Wiedergabe"),
    ("state.paused", "Pausiert"),
    ("status.ready", "Bereit"),
    ("status.now_playing", "Es läuft {0}"),
    ("status.paused", "Pausiert"),
    ("status.stopped", "Gestoppt"),
    ("status.nothing_to_do", "Nichts zu tun"),
    ("status.empty_playlist", "Wiedergabeliste ist leer"),
    ("status.end_of_playlist", "Ende der Wiedergabeliste erreicht"),
    ("status.added", "{0} Titel hinzugefügt"),
    ("status.no_midi", "Keine MIDI-Dateien unter {0}"),
    ("status.removed", "Titel {0} entfernt"),
    ("status.moved", "Titel {0} nach {1} verschoben"),
    ("status.no_track", "Kein Titel {0}"),
    ("status.selected", "{0} ausgewählt"),
    ("status.unknown_command", "Unbekannter Befehl {0}. Siehe help"),
    ("status.usage", "Aufruf: {0}"),
    ("status.cleared", "Wiedergabeliste geleert"),
    ("status.shuffled", "Wiedergabeliste gemischt"),
    ("status.sorted", "Wiedergabeliste sortiert"),
    ("status.loop", "Titel wiederholen: {0}"),
    ("status.playlist_loop", "Liste wiederholen: {0}"),
    ("status.locale", "Sprache: {0}"),
    ("status.saved", "Zustand gespeichert"),
    ("status.save_failed", "Speichern fehlgeschlagen: {0}"),
    ("status.error", "Wiedergabefehler: {0}"),
    ("word.on", "an"),
    ("word.off", "aus"),
];

const FR: &[(&str, &str)] = &[
    ("column.current", "En cours"),
    ("column.title", "Titre"),
    ("column.path", "Fichier"),
    ("state.stopped", "Arrêté"),
    ("state.playing", "Lecture"),
    ("state.paused", "En pause"),
    ("status.ready", "Prêt"),
    ("status.now_playing", "Lecture de {0}"),
    ("status.paused", "En pause"),
    ("status.stopped", "Arrêté"),
    ("status.nothing_to_do", "Rien à faire"),
    ("status.empty_playlist", "La liste de lecture est vide"),
    ("status.end_of_playlist", "Fin de la liste de lecture"),
    ("status.added", "{0} morceaux ajoutés"),
    ("status.no_midi", "Aucun fichier MIDI dans {0}"),
    ("status.removed", "Morceau {0} retiré"),
    ("status.moved", "Morceau {0} déplacé en {1}"),
    ("status.no_track", "Pas de morceau {0}"),
    ("status.selected", "{0} sélectionné"),
    ("status.unknown_command", "Commande inconnue {0}. Essayez help"),
    ("status.usage", "Utilisation : {0}"),
    ("status.cleared", "Liste de lecture vidée"),
    ("status.shuffled", "Liste de lecture mélangée"),
    ("status.sorted", "Liste de lecture triée"),
    ("status.loop", "Répéter le morceau : {0}"),
    ("status.playlist_loop", "Répéter la liste : {0}"),
    ("status.locale", "Langue : {0}"),
    ("status.saved", "État enregistré"),
    ("status.save_failed", "Échec de l'enregistrement : {0}"),
    ("status.error", "Erreur de lecture : {0}"),
    ("word.on", "oui"),
    ("word.off", "non"),
];

/// Localized strings, resolved along the active locale's fallback chain.
pub struct Messages {
    bundles: RwLock<HashMap<String, HashMap<String, String>>>,
    locale: RwLock<Locale>,
    cache: Mutex<HashMap<String, String>>,
}

impl Messages {
    pub fn empty(locale: Locale) -> Self {
        Self {
            bundles: RwLock::new(HashMap::new()),
            locale: RwLock::new(locale),
            cache: Mutex::new(HashMap::new()),
        }
    }

    pub fn builtin(locale: Locale) -> Self {
        let messages = Self::empty(locale);
        for (tag, entries) in [("en", EN), ("de", DE), ("fr", FR)] {
            messages.register_bundle(tag, entries.iter().copied());
        }
        messages
    }

    /// Adds `entries` to the bundle for `tag`, replacing existing keys.
    pub fn register_bundle<'a>(
        &self,
        tag: &str,
        entries: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) {
        let mut bundles = self.bundles.write();
        let bundle = bundles.entry(tag.to_string()).or_default();
        for (key, value) in entries {
            bundle.insert(key.to_string(), value.to_string());
        }
        drop(bundles);
        self.cache.lock().clear();
    }

    pub fn locale(&self) -> Locale {
        self.locale.read().clone()
    }

    pub fn get(&self, key: &str) -> String {
        self.get_or(key, key)
    }

    /// Never fails: a missing key is logged and `fallback` is returned.
    pub fn get_or(&self, key: &str, fallback: &str) -> String {
        if let Some(hit) = self.cache.lock().get(key) {
            return hit.clone();
        }

        let locale = self.locale();
        let resolved = {
            let bundles = self.bundles.read();
            locale
                .fallbacks()
                .into_iter()
                .find_map(|tag| bundles.get(tag).and_then(|bundle| bundle.get(key)).cloned())
        };

        match resolved {
            Some(value) => {
                self.cache.lock().insert(key.to_string(), value.clone());
                value
            }
            None => {
                warn!(key, locale = %locale, "missing message");
                fallback.to_string()
            }
        }
    }

    /// Looks up `key` and substitutes `{0}`, `{1}`, ... with `args`.
    /// Argument text is inserted as is and never rescanned. Placeholders
    /// without a matching argument stay literal.
    pub fn format(&self, key: &str, args: &[&dyn fmt::Display]) -> String {
        let template = self.get(key);
        let mut out = String::with_capacity(template.len());
        let mut rest = template.as_str();
        while let Some(open) = rest.find('{') {
            out.push_str(&rest[..open]);
            let after = &rest[open + 1..];
            let placeholder = after.find('}').and_then(|close| {
                let digits = &after[..close];
                if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
                    return None;
                }
                let arg = args.get(digits.parse::<usize>().ok()?)?;
                Some((close, arg))
            });
            match placeholder {
                Some((close, arg)) => {
                    out.push_str(&arg.to_string());
                    rest = &after[close + 1..];
                }
                None => {
                    out.push('{');
                    rest = after;
                }
            }
        }
        out.push_str(rest);
        out
    }

    pub fn on_off(&self, value: bool) -> String {
        self.get(if value { "word.on" } else { "word.off" })
    }
}

impl LocaleListener for Messages {
    fn locale_changed(&self, event: &LocaleEvent) {
        *self.locale.write() = event.new.clone();
        self.cache.lock().clear();
        debug!(locale = %event.new, "message cache invalidated");
    }
}

impl Default for Messages {
    fn default() -> Self {
        Self::builtin(Locale::default())
    }
}

impl fmt::Debug for Messages {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Messages")
            .field("locale", &*self.locale.read())
            .field("bundles", &self.bundles.read().len())
            .finish()
    }
}
