//! HTTP fallback surface.
//!
//! The web server itself is owned by the host (the provisioning portal
//! keeps one alive); the core only consumes request bodies and produces
//! responses. Four handlers, rooted at a configurable base path
//! (default `/config`):
//!
//! - `GET  <base>`                 the control page, config embedded
//! - `GET  <base>/api/ledconfig`   full config JSON
//! - `POST <base>/api/ledpreview`  apply without persisting
//! - `POST <base>/api/ledsave`     apply and persist
//! - `POST <base>/api/ledreset`    erase and restore defaults
//!
//! The GET handlers re-read the persisted record first so the page always
//! reflects the last saved state.

use embassy_time::Instant;

use crate::controller::Controller;
use crate::{ConfigStorage, StripDriver, BUILD_VERSION, COPYRIGHT};

/// Default mount path.
pub const DEFAULT_BASE: &str = "/config";

/// Every response carries this cache policy.
pub const CACHE_CONTROL: &str = "no-store";

/// A response for the host server to send verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub content_type: &'static str,
    pub body: String,
}

impl HttpResponse {
    fn ok(content_type: &'static str, body: String) -> Self {
        Self {
            status: 200,
            content_type,
            body,
        }
    }

    fn bad_request() -> Self {
        Self {
            status: 400,
            content_type: "text/plain",
            body: String::from("Bad JSON"),
        }
    }
}

/// `GET <base>`: the control page with the saved config injected, so the
/// controls fill without a follow-up fetch.
pub fn index_page<D, S>(controller: &mut Controller<D, S>, base: &str, now: Instant) -> HttpResponse
where
    D: StripDriver,
    S: ConfigStorage,
{
    controller.force_load(now);
    let html = INDEX_HTML
        .replace("%%BASE%%", base)
        .replace("%%BOOTJSON%%", &controller.config_json())
        .replace("%%VERSION%%", BUILD_VERSION)
        .replace("%%COPYRIGHT%%", COPYRIGHT);
    HttpResponse::ok("text/html", html)
}

/// `GET <base>/api/ledconfig`: the full config JSON (last saved state).
pub fn config_json<D, S>(controller: &mut Controller<D, S>, now: Instant) -> HttpResponse
where
    D: StripDriver,
    S: ConfigStorage,
{
    controller.force_load(now);
    HttpResponse::ok("application/json", controller.config_json())
}

/// `POST <base>/api/ledpreview`: apply the body without persisting.
pub fn preview<D, S>(controller: &mut Controller<D, S>, body: &str, now: Instant) -> HttpResponse
where
    D: StripDriver,
    S: ConfigStorage,
{
    match controller.apply_json_preview(body, now) {
        Ok(()) => HttpResponse::ok("application/json", String::from("{\"ok\":true}")),
        Err(_) => HttpResponse::bad_request(),
    }
}

/// `POST <base>/api/ledsave`: apply the body and persist.
pub fn save<D, S>(controller: &mut Controller<D, S>, body: &str, now: Instant) -> HttpResponse
where
    D: StripDriver,
    S: ConfigStorage,
{
    match controller.apply_json_save(body, now) {
        Ok(()) => HttpResponse::ok("application/json", String::from("{\"ok\":true}")),
        Err(_) => HttpResponse::bad_request(),
    }
}

/// `POST <base>/api/ledreset`: erase the persisted config, restore
/// defaults.
pub fn reset<D, S>(controller: &mut Controller<D, S>, now: Instant) -> HttpResponse
where
    D: StripDriver,
    S: ConfigStorage,
{
    controller.reset_to_defaults(now);
    HttpResponse::ok("application/json", String::from("{\"ok\":true}"))
}

const INDEX_HTML: &str = r#"<!doctype html><html><head>
<meta charset="utf-8"/><meta name="viewport" content="width=device-width,initial-scale=1"/>
<title>RGB Controller</title>
<style>
:root{--bg:#0f1115;--card:#161a22;--t:#d6e1ff;--muted:#94a3b8}
*{box-sizing:border-box}body{margin:0;background:var(--bg);color:var(--t);font-family:Inter,system-ui,Segoe UI,Roboto,Arial}
.container{max-width:980px;margin:24px auto;padding:0 16px}
.card{background:var(--card);border-radius:16px;padding:18px 16px;box-shadow:0 6px 24px #0008;margin-bottom:18px}
.row{display:grid;grid-template-columns:repeat(12,1fr);gap:12px}
.h{font-size:22px;margin:0 0 12px}label{font-size:13px;color:var(--muted);display:block;margin-bottom:6px}
input,select,button,textarea{width:100%;padding:10px 12px;border-radius:10px;border:1px solid #2a3142;background:#0b0e14;color:#d6e1ff}
input[type=color]{padding:0;height:40px}button{cursor:pointer}
button.primary{background:#2563eb;border:0}
.row>div{grid-column:span 12}@media(min-width:700px){.md-6{grid-column:span 6}.md-4{grid-column:span 4}.md-3{grid-column:span 3}}
.badge{display:inline-block;background:#0b1220;border:1px solid #273657;color:#9ec1ff;padding:2px 8px;border-radius:999px;font-size:12px;margin-left:8px}
.hint{color:#90a4c9;font-size:12px}
.inline{display:flex;gap:10px;flex-wrap:wrap}
.inline>label{display:flex;align-items:center;gap:6px;margin:0}
.footer{color:var(--muted);font-size:12px;text-align:center;padding:8px 0 24px}
</style></head><body><div class="container">
<div class="card">
  <h2 class="h">RGB Controller (CH1&ndash;CH4)<span id="status" class="badge">loading&hellip;</span></h2>
  <div class="row">
    <div class="md-4"><label>Mode</label>
      <select id="mode">
        <option value="0">Solid</option><option value="1">Breathe</option>
        <option value="2">Color Wipe</option><option value="3">Larson</option>
        <option value="4">Rainbow</option><option value="5">Theater Chase</option>
        <option value="6">Twinkle</option><option value="7">Comet</option>
        <option value="8">Meteor</option><option value="9">Clock Spin</option>
        <option value="10">Plasma</option><option value="11">Fire / Flicker</option>
        <option value="12">Palette Cycle</option><option value="13">Palette Chase</option>
        <option value="14">Custom (Playlist)</option>
      </select>
    </div>
    <div class="md-4"><label>Brightness</label><input id="brightness" type="range" min="1" max="255"></div>
    <div class="md-4"><label>Speed</label><input id="speed" type="range" min="0" max="255"></div>
    <div class="md-3"><label>Intensity</label><input id="intensity" type="range" min="0" max="255"></div>
    <div class="md-3"><label>Width / Gap</label><input id="width" type="range" min="1" max="20"></div>
    <div class="md-3"><label>Primary Color</label><input id="colorA" type="color"></div>
    <div class="md-3"><label>Secondary Color</label><input id="colorB" type="color"></div>
    <div class="md-3"><label>Color C</label><input id="colorC" type="color"></div>
    <div class="md-3"><label>Color D</label><input id="colorD" type="color"></div>
    <div class="md-3"><label>Palette Size</label>
      <select id="paletteCount"><option value="1">1 color</option><option value="2">2 colors</option><option value="3">3 colors</option><option value="4">4 colors</option></select>
    </div>
    <div class="md-3"><label>CH1 (Front) Count</label><input id="c0" type="number" min="0" max="50"></div>
    <div class="md-3"><label>CH2 (Left) Count</label><input id="c1" type="number" min="0" max="50"></div>
    <div class="md-3"><label>CH3 (Rear) Count</label><input id="c2" type="number" min="0" max="50"></div>
    <div class="md-3"><label>CH4 (Right) Count</label><input id="c3" type="number" min="0" max="50"></div>
    <div class="md-6"><div class="inline">
      <label><input id="rev0" type="checkbox"> Reverse CH1</label>
      <label><input id="rev1" type="checkbox"> Reverse CH2</label>
      <label><input id="rev2" type="checkbox"> Reverse CH3</label>
      <label><input id="rev3" type="checkbox"> Reverse CH4</label>
    </div></div>
    <div class="md-6"><div class="inline">
      <label><input id="masterOff" type="checkbox"> Master Off (blank all channels)</label>
    </div></div>
    <div class="md-6"><div class="inline">
      <label><input id="smbusCpu" type="checkbox"> CPU temp LEDs (CH5)</label>
      <label><input id="smbusFan" type="checkbox"> Fan speed LEDs (CH6)</label>
    </div></div>
    <div class="md-6"><label>Resume last mode on boot</label>
      <select id="resume"><option value="true">Yes</option><option value="false">No</option></select>
    </div>
    <div class="md-6"><div class="inline"><label><input id="customLoop" type="checkbox"> Loop playlist</label></div>
      <label>Playlist steps (JSON array)</label><textarea id="customSeq" rows="6"></textarea>
      <span class="hint">Example: [{"mode":0,"duration":1000,"colorA":16711680},{"mode":7,"duration":1200,"speed":200,"width":6}]</span>
    </div>
    <div class="md-6"><button class="primary" id="save">Save</button></div>
    <div class="md-6"><button id="revert">Reload</button></div>
    <div class="md-6"><button id="reset">Reset Defaults</button></div>
    <div class="md-6"><span class="hint">All changes preview live. Click Save to persist.</span></div>
  </div>
</div>
<div class="footer"><span>%%COPYRIGHT%%</span> &bull; <span>v%%VERSION%%</span></div>
</div>
<script>
const el=id=>document.getElementById(id);
const hex24=n=>'#'+('000000'+n.toString(16)).slice(-6);
const to24=hex=>parseInt(hex.replace('#',''),16);
const BASE='%%BASE%%';
const BOOT=%%BOOTJSON%%;
let syncing=false;
function fill(s){
  syncing=true;
  el('mode').value=s.mode; el('brightness').value=s.brightness; el('speed').value=s.speed;
  el('intensity').value=s.intensity; el('width').value=s.width;
  el('colorA').value=hex24(s.colorA); el('colorB').value=hex24(s.colorB);
  el('colorC').value=hex24(s.colorC); el('colorD').value=hex24(s.colorD);
  el('paletteCount').value=s.paletteCount;
  for(let i=0;i<4;i++){el('c'+i).value=s.count[i]; el('rev'+i).checked=s.reverse[i];}
  el('masterOff').checked=s.masterOff; el('smbusCpu').checked=s.enableCpu; el('smbusFan').checked=s.enableFan;
  el('resume').value=String(s.resumeOnBoot);
  el('customLoop').checked=s.customLoop; el('customSeq').value=s.customSeq;
  el('status').textContent=s.inPreview?'live':'ready';
  syncing=false;
}
function collect(){
  return {mode:+el('mode').value,brightness:+el('brightness').value,speed:+el('speed').value,
    intensity:+el('intensity').value,width:+el('width').value,
    colorA:to24(el('colorA').value),colorB:to24(el('colorB').value),
    colorC:to24(el('colorC').value),colorD:to24(el('colorD').value),
    paletteCount:+el('paletteCount').value,
    count:[+el('c0').value,+el('c1').value,+el('c2').value,+el('c3').value],
    reverse:[el('rev0').checked,el('rev1').checked,el('rev2').checked,el('rev3').checked],
    masterOff:el('masterOff').checked,enableCpu:el('smbusCpu').checked,enableFan:el('smbusFan').checked,
    resumeOnBoot:el('resume').value==='true',
    customLoop:el('customLoop').checked,customSeq:el('customSeq').value};
}
async function post(path,body){
  const r=await fetch(BASE+path,{method:'POST',body:JSON.stringify(body||{})});
  el('status').textContent=r.ok?'live':'error';
  return r;
}
async function load(){
  const r=await fetch(BASE+'/api/ledconfig'); fill(await r.json());
}
function preview(){ if(!syncing) post('/api/ledpreview',collect()); }
async function saveCfg(){ await post('/api/ledsave',collect()); el('status').textContent='saved'; }
async function resetCfg(){ await post('/api/ledreset'); await load(); el('status').textContent='reset'; }
document.querySelectorAll('input,select,textarea').forEach(n=>{
  const ev=(n.tagName==='SELECT'||n.type==='checkbox')?'change':'input';
  n.addEventListener(ev,preview);
});
el('save').addEventListener('click',saveCfg);
el('revert').addEventListener('click',load);
el('reset').addEventListener('click',resetCfg);
fill(BOOT);
</script></body></html>
"#;
