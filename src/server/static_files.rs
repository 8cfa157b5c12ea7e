pub const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>airwatch</title>
<meta name="viewport" content="width=device-width, initial-scale=1">
<link rel="stylesheet" href="https://unpkg.com/leaflet@1.9.4/dist/leaflet.css">
<script src="https://unpkg.com/leaflet@1.9.4/dist/leaflet.js"></script>
<style>
  body { font-family: system-ui, sans-serif; margin: 0; display: flex; min-height: 100vh; }
  aside { width: 18rem; padding: 1rem; background: #f3f4f6; }
  main { flex: 1; padding: 1rem 2rem; }
  select, input { width: 100%; margin: 0.25rem 0 0.75rem; padding: 0.3rem; }
  .metrics { display: flex; gap: 2rem; margin: 1rem 0; }
  .metric .label { color: #6b7280; font-size: 0.85rem; }
  .metric .value { font-size: 1.6rem; }
  .warning { background: #fef3c7; padding: 0.75rem; }
  .error { background: #fee2e2; padding: 0.75rem; }
  #map { height: 360px; display: none; }
  .hidden { display: none; }
</style>
</head>
<body>
<aside>
  <label for="mode">Select a location by category:</label>
  <select id="mode">
    <option value="">Select a location...</option>
    <option value="city">By City, State, and Country</option>
    <option value="nearest">By Nearest City (IP Address)</option>
    <option value="coords">By Latitude and Longitude</option>
  </select>
</aside>
<main>
  <h1>Weather and Air Quality Web App</h1>
  <h2>airwatch and AirVisual API</h2>
  <p id="location">Location: None</p>

  <div id="names" class="hidden">
    <label>Select a country <select id="country"></select></label>
    <label>Select a state <select id="state"></select></label>
    <label>Select a city <select id="city"></select></label>
  </div>
  <div id="coords" class="hidden">
    <label>Enter Latitude, ex: 25.793449 <input id="lat"></label>
    <label>Enter Longitude, ex: -80.139198 <input id="lon"></label>
  </div>

  <div id="notice"></div>
  <h3 id="heading"></h3>
  <div class="metrics" id="metrics"></div>
  <div id="map"></div>
</main>
<script>
const $ = (id) => document.getElementById(id);
const labels = { city: "By City, State, and Country", nearest: "By Nearest City (IP Address)", coords: "By Latitude and Longitude" };
let map = null;

function fillSelect(select, names, keep) {
  select.innerHTML = "";
  for (const name of [""].concat(names)) {
    const opt = document.createElement("option");
    opt.value = name; opt.textContent = name;
    select.appendChild(opt);
  }
  select.value = names.includes(keep) ? keep : "";
}

function clearOutput() {
  $("notice").innerHTML = ""; $("heading").textContent = ""; $("metrics").innerHTML = "";
  $("map").style.display = "none";
}

function showNotice(kind, text) {
  $("notice").innerHTML = `<div class="${kind}">${text}</div>`;
}

function showReport(report) {
  $("heading").textContent = report.heading;
  const c = report.conditions;
  const fahrenheit = c.temperature_celsius * 9 / 5 + 32;
  const f = Number.isInteger(fahrenheit) ? fahrenheit.toFixed(1) : String(fahrenheit);
  const metrics = [
    ["Temperature", `${c.temperature_celsius} °C/ ${f} °F`],
    ["Humidity", `${c.humidity_percent}%`],
    ["Air Quality Index", `${c.aqi}`],
  ];
  $("metrics").innerHTML = metrics.map(([l, v]) =>
    `<div class="metric"><div class="label">${l}</div><div class="value">${v}</div></div>`).join("");
  const el = $("map");
  el.style.display = "block";
  const center = [report.map.latitude, report.map.longitude];
  if (!map) {
    map = L.map("map");
    L.tileLayer("https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png",
      { attribution: "&copy; OpenStreetMap contributors" }).addTo(map);
  }
  map.eachLayer((layer) => { if (layer instanceof L.Marker) map.removeLayer(layer); });
  map.setView(center, report.map.zoom);
  L.marker(center).addTo(map).bindPopup(report.map.marker).bindTooltip(report.map.marker);
  map.invalidateSize();
}

async function evaluate() {
  const mode = $("mode").value;
  $("location").textContent = `Location: ${labels[mode] || "None"}`;
  $("names").classList.toggle("hidden", mode !== "city");
  $("coords").classList.toggle("hidden", mode !== "coords");
  clearOutput();

  const params = new URLSearchParams({ mode });
  if (mode === "city") {
    params.set("country", $("country").value || "");
    params.set("state", $("state").value || "");
    params.set("city", $("city").value || "");
  } else if (mode === "coords") {
    params.set("lat", $("lat").value);
    params.set("lon", $("lon").value);
  }

  const res = await fetch(`/api/conditions?${params}`);
  const body = await res.json();
  if (!res.ok) { showNotice("error", body.message); return; }

  const v = body.value;
  switch (body.state) {
    case "cascade_in_progress":
      if (v.awaiting === "country") { fillSelect($("country"), v.options, ""); fillSelect($("state"), [], ""); fillSelect($("city"), [], ""); }
      if (v.awaiting === "state") { fillSelect($("state"), v.options, ""); fillSelect($("city"), [], ""); }
      if (v.awaiting === "city") { fillSelect($("city"), v.options, ""); }
      if (v.awaiting === "coordinates" && v.problem) { showNotice("warning", v.problem); }
      break;
    case "conditions_ready":
      showReport(v);
      break;
    case "failed":
      showNotice(v.severity === "warning" ? "warning" : "error", v.message);
      break;
  }
}

$("mode").addEventListener("change", evaluate);
$("country").addEventListener("change", () => { fillSelect($("state"), [], ""); fillSelect($("city"), [], ""); evaluate(); });
$("state").addEventListener("change", () => { fillSelect($("city"), [], ""); evaluate(); });
$("city").addEventListener("change", evaluate);
$("lat").addEventListener("change", evaluate);
$("lon").addEventListener("change", evaluate);
</script>
</body>
</html>
"#;
