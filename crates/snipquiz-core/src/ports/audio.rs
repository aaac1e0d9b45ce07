use tokio::sync::watch;

use crate::domain::song::AudioRef;

/// Port del reproductor de audio subyacente.
///
/// Es una primitiva opaca: decodificar y sonar es cosa del adapter. La posición
/// la publica el propio reproductor en un canal `watch`, con la cadencia que
/// tenga su notificación nativa; el runtime se suscribe al arrancar la partida
/// y la traduce en progreso del fragmento.
pub trait AudioPlayer: Send + Sync {
  fn set_source(&self, source: &AudioRef);
  fn seek(&self, position_seconds: f64);
  fn play(&self);
  fn pause(&self);

  /// Nuevo receptor de la posición de reproducción, en segundos.
  fn positions(&self) -> watch::Receiver<f64>;
}
